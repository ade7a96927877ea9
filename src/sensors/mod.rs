//! Sensor modules for the MPU-6050
//!
//! This module provides types and conversions for each sensor in the MPU-6050:
//! - Accelerometer (3-axis)
//! - Gyroscope (3-axis)
//! - Die temperature
//!
//! All sensor operations are performed through methods on `Gy521`.

pub mod accelerometer;
pub mod gyroscope;
pub mod temperature;

// Re-export main types
pub use accelerometer::{AccelDataG, AccelOffset, AccelSensitivity};
pub use gyroscope::{GyroDataDps, GyroOffset, GyroSensitivity};

/// Sensor axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// X, Y and Z in register order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}
