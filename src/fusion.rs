//! Orientation estimate from accelerometer tilt and integrated gyro rate
//!
//! Roll and pitch are a fixed complementary blend of the gyro-integrated angle
//! (low noise, drifts) and the accelerometer tilt angle (noisy, no drift).
//! Yaw has no accelerometer reference and is the plain gyro integral.
//!
//! Axis pairing:
//!
//! | Output | Gyro integral | Tilt                                |
//! |--------|---------------|-------------------------------------|
//! | pitch  | X             | `atan(-ax / sqrt(ay² + az²))`       |
//! | roll   | Y             | `atan(ay / sqrt(ax² + az²))`        |
//! | yaw    | Z             | none                                |
//!
//! The tilt ratios are not guarded: a zero denominator yields ±inf inside
//! `atan` (±90°) and an all-zero vector yields NaN, which then propagates into
//! pitch and roll.

use crate::sensors::{AccelDataG, GyroDataDps};

/// Weight of the gyro-integrated angle in the blend
pub const GYRO_WEIGHT: f32 = 0.96;

/// Weight of the accelerometer tilt angle in the blend
pub const ACCEL_WEIGHT: f32 = 0.04;

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Accelerometer-only tilt angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltAngles {
    /// `atan(-ax / sqrt(ay² + az²))`
    pub x: f32,
    /// `atan(ay / sqrt(ax² + az²))`
    pub y: f32,
    /// `atan(az / sqrt(ax² + ay²))`
    pub z: f32,
}

impl TiltAngles {
    /// Tilt of the gravity vector
    #[must_use]
    pub fn from_accel(accel: &AccelDataG) -> Self {
        let ax2 = accel.x * accel.x;
        let ay2 = accel.y * accel.y;
        let az2 = accel.z * accel.z;

        Self {
            x: libm::atanf(-accel.x / libm::sqrtf(ay2 + az2)) * RAD_TO_DEG,
            y: libm::atanf(accel.y / libm::sqrtf(ax2 + az2)) * RAD_TO_DEG,
            z: libm::atanf(accel.z / libm::sqrtf(ax2 + ay2)) * RAD_TO_DEG,
        }
    }
}

/// Gyro rate integrated over time, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroAngles {
    /// Integrated X rate
    pub x: f32,
    /// Integrated Y rate
    pub y: f32,
    /// Integrated Z rate
    pub z: f32,
}

/// Fused orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    /// Pitch in degrees
    pub pitch: f32,
    /// Roll in degrees
    pub roll: f32,
    /// Yaw in degrees (drifts, no absolute reference)
    pub yaw: f32,
}

/// Complementary filter state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComplementaryFilter {
    tilt: TiltAngles,
    gyro_angles: GyroAngles,
    orientation: Orientation,
}

impl ComplementaryFilter {
    /// Filter with all angles at zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tilt: TiltAngles {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            gyro_angles: GyroAngles {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            orientation: Orientation {
                pitch: 0.0,
                roll: 0.0,
                yaw: 0.0,
            },
        }
    }

    /// Recompute the tilt angles from a fresh acceleration sample
    pub fn update_tilt(&mut self, accel: &AccelDataG) {
        self.tilt = TiltAngles::from_accel(accel);
    }

    /// Accumulate `rate * dt` on each axis (`dt` in seconds)
    pub fn integrate(&mut self, rate: &GyroDataDps, dt: f32) {
        self.gyro_angles.x += rate.x * dt;
        self.gyro_angles.y += rate.y * dt;
        self.gyro_angles.z += rate.z * dt;
    }

    /// Blend the current gyro integrals with the current tilt
    ///
    /// Uses whatever tilt was last computed, even if it is older than the
    /// gyro data.
    pub fn fuse(&mut self) {
        self.orientation = Orientation {
            pitch: GYRO_WEIGHT * self.gyro_angles.x + ACCEL_WEIGHT * self.tilt.x,
            roll: GYRO_WEIGHT * self.gyro_angles.y + ACCEL_WEIGHT * self.tilt.y,
            yaw: self.gyro_angles.z,
        };
    }

    /// Zero every angle
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Accelerometer-only tilt angles
    #[must_use]
    pub const fn tilt(&self) -> TiltAngles {
        self.tilt
    }

    /// Gyro-integrated angles
    #[must_use]
    pub const fn gyro_angles(&self) -> GyroAngles {
        self.gyro_angles
    }

    /// Last fused orientation
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }
}
