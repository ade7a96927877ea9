//! Die temperature conversion
//!
//! The MPU-6050 datasheet gives `Temp_degC = TEMP_OUT / 340 + 36.53`.

/// °C per LSB
pub const CELSIUS_PER_LSB: f32 = 1.0 / 340.0;

/// Temperature at raw value 0, in °C
pub const CELSIUS_OFFSET: f32 = 36.53;

/// Convert a raw `TEMP_OUT` value to degrees Celsius
#[must_use]
pub fn raw_to_celsius(raw: i16) -> f32 {
    f32::from(raw) * CELSIUS_PER_LSB + CELSIUS_OFFSET
}
