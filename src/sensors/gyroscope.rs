//! Gyroscope sensor types and conversion
//!
//! Provides the full-scale selection, scaled data and bias offsets for the
//! MPU-6050's 3-axis gyroscope.

use super::Axis;

/// °/s per LSB at the most sensitive range (±250°/s, 131 LSB/(°/s))
pub const RAW_TO_DPS: f32 = 1.0 / 131.0;

/// Gyroscope full-scale range (`FS_SEL`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroSensitivity {
    /// ±250°/s range
    #[default]
    Dps250 = 0,
    /// ±500°/s range
    Dps500 = 1,
    /// ±1000°/s range
    Dps1000 = 2,
    /// ±2000°/s range
    Dps2000 = 3,
}

impl GyroSensitivity {
    /// Map a 2-bit code to a range; codes above 3 clamp to ±2000°/s
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Dps250,
            1 => Self::Dps500,
            2 => Self::Dps1000,
            _ => Self::Dps2000,
        }
    }

    /// The 2-bit register code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Conversion factor in (°/s)/LSB: `(1 << code) / 131`
    #[must_use]
    pub fn scale(self) -> f32 {
        f32::from(1u8 << self.code()) * RAW_TO_DPS
    }

    /// Get the maximum value in °/s
    #[must_use]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps1000 => 1000,
            Self::Dps2000 => 2000,
        }
    }
}

impl From<u8> for GyroSensitivity {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// Per-axis gyroscope bias in °/s, added after scaling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroOffset {
    /// X-axis bias in °/s
    pub x: f32,
    /// Y-axis bias in °/s
    pub y: f32,
    /// Z-axis bias in °/s
    pub z: f32,
}

impl GyroOffset {
    /// Bias for one axis
    #[must_use]
    pub const fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Set the bias for one axis
    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

/// Gyroscope data in degrees per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroDataDps {
    /// X-axis rotation rate in °/s
    pub x: f32,
    /// Y-axis rotation rate in °/s
    pub y: f32,
    /// Z-axis rotation rate in °/s
    pub z: f32,
}

impl GyroDataDps {
    /// Create from raw sensor values
    ///
    /// Each axis is `raw * scale + offset`.
    #[must_use]
    pub fn from_raw(raw: [i16; 3], scale: f32, offset: &GyroOffset) -> Self {
        Self {
            x: f32::from(raw[0]) * scale + offset.x,
            y: f32::from(raw[1]) * scale + offset.y,
            z: f32::from(raw[2]) * scale + offset.z,
        }
    }

    /// Value for one axis
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Get the magnitude of the rotation rate vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
