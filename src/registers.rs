//! Register definitions for the MPU-6050 on the GY-521 breakout
//!
//! The configuration registers the driver touches are declared as bit fields
//! through `device-driver` ([`Mpu6050`]). The [`Register`] enum lists raw
//! addresses for the measurement block starts and for
//! [`Gy521::write_register`] / [`Gy521::read_register`].
//!
//! ## Data block layout
//!
//! The measurement registers are contiguous and big-endian:
//!
//! | Offset | Register       | Content          |
//! |--------|----------------|------------------|
//! | 0..6   | `ACCEL_XOUT_H` | accel X, Y, Z    |
//! | 6..8   | `TEMP_OUT_H`   | temperature      |
//! | 8..14  | `GYRO_XOUT_H`  | gyro X, Y, Z     |
//!
//! [`Gy521::write_register`]: crate::Gy521::write_register
//! [`Gy521::read_register`]: crate::Gy521::read_register

device_driver::create_device!(
    device_name: Mpu6050,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// GYRO_CONFIG - Gyroscope self-test and full-scale select (0x1B)
        register GyroConfig {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..3,
            /// Full scale: 0=±250, 1=±500, 2=±1000, 3=±2000 °/s
            fs_sel: uint = 3..5,
            /// Z axis self-test
            zg_st: bool = 5,
            /// Y axis self-test
            yg_st: bool = 6,
            /// X axis self-test
            xg_st: bool = 7,
        },

        /// ACCEL_CONFIG - Accelerometer self-test and full-scale select (0x1C)
        register AccelConfig {
            const ADDRESS = 0x1C;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..3,
            /// Full scale: 0=±2g, 1=±4g, 2=±8g, 3=±16g
            fs_sel: uint = 3..5,
            /// Z axis self-test
            za_st: bool = 5,
            /// Y axis self-test
            ya_st: bool = 6,
            /// X axis self-test
            xa_st: bool = 7,
        },

        /// PWR_MGMT_1 - Power management 1 (0x6B)
        ///
        /// Powers up with SLEEP set; an all-zero write wakes the device on the
        /// internal oscillator.
        register PwrMgmt1 {
            const ADDRESS = 0x6B;
            const SIZE_BITS = 8;

            /// Clock source (0 = internal 8 MHz oscillator)
            clksel: uint = 0..3,
            /// Disable the temperature sensor
            temp_dis: bool = 3,
            reserved_4: uint = 4..5,
            /// Cycle between sleep and single samples
            cycle: bool = 5,
            /// Sleep mode
            sleep: bool = 6,
            /// Reset all registers to their defaults
            device_reset: bool = 7,
        },
    }
);

/// MPU-6050 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// `SMPLRT_DIV` - Sample rate divider (0x19)
    SmplrtDiv = 0x19,
    /// `CONFIG` - External sync and digital low pass filter (0x1A)
    Config = 0x1A,
    /// `GYRO_CONFIG` - Gyroscope self-test and full-scale select (0x1B)
    GyroConfig = 0x1B,
    /// `ACCEL_CONFIG` - Accelerometer self-test and full-scale select (0x1C)
    AccelConfig = 0x1C,
    /// `ACCEL_XOUT_H` - First byte of the accelerometer block (0x3B)
    AccelXoutH = 0x3B,
    /// `TEMP_OUT_H` - First byte of the temperature reading (0x41)
    TempOutH = 0x41,
    /// `GYRO_XOUT_H` - First byte of the gyroscope block (0x43)
    GyroXoutH = 0x43,
    /// `PWR_MGMT_1` - Power management 1, holds the SLEEP bit (0x6B)
    PwrMgmt1 = 0x6B,
    /// `PWR_MGMT_2` - Power management 2 (0x6C)
    PwrMgmt2 = 0x6C,
    /// `WHO_AM_I` - Device identity (0x75)
    WhoAmI = 0x75,
}

impl Register {
    /// Register address on the bus
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    fn from(register: Register) -> Self {
        register.addr()
    }
}

/// Accelerometer block length (X, Y, Z)
pub const ACCEL_BLOCK_LEN: usize = 6;

/// Temperature reading length
pub const TEMP_LEN: usize = 2;

/// Gyroscope block length (X, Y, Z)
pub const GYRO_BLOCK_LEN: usize = 6;

/// Accelerometer, temperature and gyroscope in one burst
pub const FULL_BLOCK_LEN: usize = ACCEL_BLOCK_LEN + TEMP_LEN + GYRO_BLOCK_LEN;
