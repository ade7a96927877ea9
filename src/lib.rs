#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod clock;
pub mod device;
pub mod fusion;
pub mod interface;
pub mod registers;
pub mod sensors;
pub mod throttle;

// Re-export main types
pub use clock::Clock;
#[cfg(feature = "embassy-time")]
pub use clock::EmbassyClock;
pub use device::{AccelData, GyroData, Gy521, RawSample, SampleOutcome};
#[cfg(feature = "async")]
pub use interface::AsyncBusInterface;
pub use interface::{BusInterface, BusPins, DeviceInterface, I2cInterface};
pub use registers::{Mpu6050, Register};
pub use sensors::{
    AccelDataG, AccelOffset, AccelSensitivity, Axis, GyroDataDps, GyroOffset, GyroSensitivity,
};

pub use fusion::{ComplementaryFilter, GyroAngles, Orientation, TiltAngles};
pub use throttle::{DEFAULT_THROTTLE_MS, Throttle, ThrottleConfig};

/// GY-521 I2C address when AD0 pin is low (default: 0x68)
///
/// Most breakout boards pull AD0 low through a resistor.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// GY-521 I2C address when AD0 pin is high (alternative: 0x69)
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Outcome of the last driver operation
///
/// The numeric codes match the ones used by the Arduino GY521 library so they
/// can be forwarded to tooling that expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Operation completed
    #[default]
    Ok,
    /// Sampling skipped by the throttle (not an error)
    Throttled,
    /// Burst read failed or returned the wrong number of bytes
    ReadError,
    /// Register select or register write was not acknowledged
    WriteError,
    /// Device did not acknowledge its address
    NotConnected,
}

impl Status {
    /// Legacy numeric status code
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Ok => 0,
            Self::Throttled => 1,
            Self::ReadError => -1,
            Self::WriteError => -2,
            Self::NotConnected => -3,
        }
    }

    /// `true` for the statuses that represent a failure
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.code() < 0
    }
}

/// Driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus initialization failed
    Bus(E),
    /// Register select or register write was not acknowledged
    Write(E),
    /// Burst read failed on the bus
    Read(E),
    /// Burst read returned a different number of bytes than requested
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes actually received
        received: usize,
    },
    /// Device did not acknowledge its address
    NotConnected,
    /// Explicit bus pins were requested but the transport cannot assign pins
    UnsupportedPins,
    /// Invalid configuration parameter
    InvalidConfig,
}

impl<E> Error<E> {
    /// Status code recorded for this error
    ///
    /// `None` for `InvalidConfig`, which is rejected before any bus traffic
    /// and leaves the last status untouched.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::Write(_) => Some(Status::WriteError),
            Self::Read(_) | Self::ShortRead { .. } => Some(Status::ReadError),
            Self::Bus(_) | Self::NotConnected | Self::UnsupportedPins => {
                Some(Status::NotConnected)
            }
            Self::InvalidConfig => None,
        }
    }
}
