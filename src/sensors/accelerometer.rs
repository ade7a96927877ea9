//! Accelerometer sensor types and conversion
//!
//! Provides the full-scale selection, scaled data and bias offsets for the
//! MPU-6050's 3-axis accelerometer.

use super::Axis;

/// g per LSB at the most sensitive range (±2g, 16384 LSB/g)
pub const RAW_TO_G: f32 = 1.0 / 16384.0;

/// Accelerometer full-scale range (`AFS_SEL`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelSensitivity {
    /// ±2g range (most sensitive, least range)
    #[default]
    G2 = 0,
    /// ±4g range
    G4 = 1,
    /// ±8g range
    G8 = 2,
    /// ±16g range (least sensitive, most range)
    G16 = 3,
}

impl AccelSensitivity {
    /// Map a 2-bit code to a range; codes above 3 clamp to ±16g
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::G2,
            1 => Self::G4,
            2 => Self::G8,
            _ => Self::G16,
        }
    }

    /// The 2-bit register code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Conversion factor in g/LSB: `(1 << code) / 16384`
    #[must_use]
    pub fn scale(self) -> f32 {
        f32::from(1u8 << self.code()) * RAW_TO_G
    }

    /// Get the maximum value in g
    #[must_use]
    pub const fn max_value(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

impl From<u8> for AccelSensitivity {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// Per-axis accelerometer bias in g, added after scaling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelOffset {
    /// X-axis bias in g
    pub x: f32,
    /// Y-axis bias in g
    pub y: f32,
    /// Z-axis bias in g
    pub z: f32,
}

impl AccelOffset {
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

/// Accelerometer data in physical units (g-force)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelDataG {
    /// X-axis acceleration in g
    pub x: f32,
    /// Y-axis acceleration in g
    pub y: f32,
    /// Z-axis acceleration in g
    pub z: f32,
}

impl AccelDataG {
    /// Create from raw sensor values
    ///
    /// Each axis is `raw * scale + offset`.
    ///
    /// # Arguments
    ///
    /// * `raw` - Raw X, Y, Z values
    /// * `scale` - g/LSB (from [`AccelSensitivity::scale`])
    /// * `offset` - Bias added after scaling
    #[must_use]
    pub fn from_raw(raw: [i16; 3], scale: f32, offset: &AccelOffset) -> Self {
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

    /// Get the magnitude of the acceleration vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
