//! High-level driver API for the GY-521
//!
//! This module provides [`Gy521`], which owns the bus interface, the clock,
//! scaling and calibration state, and the fused orientation estimate.
//!
//! Every sampling call follows the same protocol:
//! 1. Throttle check (full, accelerometer and gyroscope reads only)
//! 2. Write the starting register address; a NACK fails with [`Error::Write`]
//! 3. Burst read of the block; a bus failure or byte count mismatch fails with
//!    [`Error::Read`] / [`Error::ShortRead`]
//! 4. Big-endian decode and conversion
//!
//! Nothing is converted or updated when step 2 or 3 fails.

use crate::clock::{Clock, elapsed};
use crate::fusion::{ComplementaryFilter, GyroAngles, Orientation, TiltAngles};
use crate::registers::{self, FULL_BLOCK_LEN, Mpu6050, Register};
use crate::sensors::temperature;
use crate::sensors::{
    AccelDataG, AccelOffset, AccelSensitivity, Axis, GyroDataDps, GyroOffset, GyroSensitivity,
};
use crate::throttle::{DEFAULT_THROTTLE_MS, Throttle, ThrottleConfig};
use crate::{Error, Status};

#[cfg(feature = "async")]
use crate::interface::AsyncBusInterface;
#[cfg(not(feature = "async"))]
use crate::interface::BusInterface;
use crate::interface::{BusPins, DeviceInterface};
#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Delay between samples while calibrating
const CALIBRATION_SAMPLE_DELAY_MS: u32 = 2;

/// Accelerometer data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// X-axis acceleration (raw)
    pub x: i16,
    /// Y-axis acceleration (raw)
    pub y: i16,
    /// Z-axis acceleration (raw)
    pub z: i16,
}

/// Gyroscope data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroData {
    /// X-axis rotation (raw)
    pub x: i16,
    /// Y-axis rotation (raw)
    pub y: i16,
    /// Z-axis rotation (raw)
    pub z: i16,
}

impl AccelData {
    fn from_be_bytes(bytes: &[u8]) -> Self {
        let [x, y, z] = decode_axes(bytes);
        Self { x, y, z }
    }

    const fn to_array(self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

impl GyroData {
    fn from_be_bytes(bytes: &[u8]) -> Self {
        let [x, y, z] = decode_axes(bytes);
        Self { x, y, z }
    }

    const fn to_array(self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

/// One raw sample as laid out in the 14-byte measurement block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Raw accelerometer axes
    pub accel: AccelData,
    /// Raw temperature
    pub temperature: i16,
    /// Raw gyroscope axes
    pub gyro: GyroData,
}

impl RawSample {
    /// Decode the big-endian `ACCEL_XOUT_H..=GYRO_ZOUT_L` block
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8; FULL_BLOCK_LEN]) -> Self {
        Self {
            accel: AccelData::from_be_bytes(&bytes[0..6]),
            temperature: i16::from_be_bytes([bytes[6], bytes[7]]),
            gyro: GyroData::from_be_bytes(&bytes[8..14]),
        }
    }
}

fn decode_axes(bytes: &[u8]) -> [i16; 3] {
    [
        i16::from_be_bytes([bytes[0], bytes[1]]),
        i16::from_be_bytes([bytes[2], bytes[3]]),
        i16::from_be_bytes([bytes[4], bytes[5]]),
    ]
}

/// Result of a successful sampling call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleOutcome {
    /// New data was read and converted
    Fresh,
    /// Skipped by the throttle; nothing was read or changed
    Throttled,
}

/// Register block read by a sampling call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Full,
    Accel,
    Gyro,
    Temperature,
}

impl Block {
    const fn start(self) -> Register {
        match self {
            Self::Full | Self::Accel => Register::AccelXoutH,
            Self::Gyro => Register::GyroXoutH,
            Self::Temperature => Register::TempOutH,
        }
    }

    const fn len(self) -> usize {
        match self {
            Self::Full => registers::FULL_BLOCK_LEN,
            Self::Accel => registers::ACCEL_BLOCK_LEN,
            Self::Gyro => registers::GYRO_BLOCK_LEN,
            Self::Temperature => registers::TEMP_LEN,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn size_bits(self) -> u32 {
        (self.len() * 8) as u32
    }

    /// Temperature reads bypass the throttle
    const fn is_throttled(self) -> bool {
        !matches!(self, Self::Temperature)
    }
}

/// Offsets and throttle saved while calibration runs
#[derive(Debug, Clone, Copy)]
struct CalibrationSnapshot {
    accel_offset: AccelOffset,
    gyro_offset: GyroOffset,
    throttle: ThrottleConfig,
}

/// Running sums of calibration samples
#[derive(Debug, Clone, Copy, Default)]
struct BiasAccumulator {
    accel: [f32; 3],
    gyro: [f32; 3],
    count: u16,
}

impl BiasAccumulator {
    fn add(&mut self, accel: &AccelDataG, gyro: &GyroDataDps) {
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            self.accel[i] += accel.axis(axis);
            self.gyro[i] += gyro.axis(axis);
        }
        self.count += 1;
    }

    /// Offsets that bring the mean to (0, 0, +1g) and (0, 0, 0)°/s
    fn offsets(&self) -> (AccelOffset, GyroOffset) {
        let n = f32::from(self.count.max(1));
        (
            AccelOffset {
                x: -self.accel[0] / n,
                y: -self.accel[1] / n,
                z: 1.0 - self.accel[2] / n,
            },
            GyroOffset {
                x: -self.gyro[0] / n,
                y: -self.gyro[1] / n,
                z: -self.gyro[2] / n,
            },
        )
    }
}

/// Main driver for the GY-521
///
/// `I` is the bus transport ([`BusInterface`](crate::BusInterface), or
/// `AsyncBusInterface` with the `async` feature) and `C` the [`Clock`].
/// Configuration registers are accessed through the generated [`Mpu6050`]
/// register device. The driver performs no locking; callers sharing a bus
/// must serialize access themselves.
pub struct Gy521<I, C> {
    device: Mpu6050<DeviceInterface<I>>,
    clock: C,
    status: Status,
    // Full-scale selection and derived conversion factors
    accel_sensitivity: AccelSensitivity,
    gyro_sensitivity: GyroSensitivity,
    raw2g: f32,
    raw2dps: f32,
    // Bias offsets, added after scaling
    accel_offset: AccelOffset,
    gyro_offset: GyroOffset,
    throttle: Throttle,
    // Timestamp of the previous angular sample (µs)
    last_us: Option<u32>,
    raw: RawSample,
    accel: AccelDataG,
    gyro: GyroDataDps,
    temperature: f32,
    filter: ComplementaryFilter,
}

impl<I, C> Gy521<I, C> {
    /// Create a driver for the device at `address`
    ///
    /// No bus traffic happens until [`connect`](Self::connect) or a read.
    /// Sensitivities start at the power-on defaults (±2g, ±250°/s).
    pub fn new(interface: I, clock: C, address: u8) -> Self {
        let mut driver = Self {
            device: Mpu6050::new(DeviceInterface::new(interface, address)),
            clock,
            status: Status::Ok,
            accel_sensitivity: AccelSensitivity::G2,
            gyro_sensitivity: GyroSensitivity::Dps250,
            raw2g: AccelSensitivity::G2.scale(),
            raw2dps: GyroSensitivity::Dps250.scale(),
            accel_offset: AccelOffset::default(),
            gyro_offset: GyroOffset::default(),
            throttle: Throttle::new(ThrottleConfig::default()),
            last_us: None,
            raw: RawSample::default(),
            accel: AccelDataG::default(),
            gyro: GyroDataDps::default(),
            temperature: 0.0,
            filter: ComplementaryFilter::new(),
        };
        driver.reset();
        driver
    }

    /// Zero all sample and orientation state
    ///
    /// Restores the default throttle interval and forgets the last sample
    /// and integration timestamps. Offsets, sensitivities and the throttle
    /// enable flag are kept.
    pub fn reset(&mut self) {
        self.throttle.set_interval_ms(DEFAULT_THROTTLE_MS);
        self.throttle.clear();
        self.last_us = None;
        self.raw = RawSample::default();
        self.accel = AccelDataG::default();
        self.gyro = GyroDataDps::default();
        self.temperature = 0.0;
        self.filter.reset();
    }

    /// Device address on the bus
    pub const fn address(&self) -> u8 {
        self.device.interface.address()
    }

    /// Outcome of the last operation
    pub const fn last_status(&self) -> Status {
        self.status
    }

    /// Last raw sample (fields not touched by partial reads keep older data)
    pub const fn raw(&self) -> RawSample {
        self.raw
    }

    /// Acceleration in g, offsets applied
    pub const fn acceleration(&self) -> AccelDataG {
        self.accel
    }

    /// Angular rate in °/s, offsets applied
    pub const fn angular_rate(&self) -> GyroDataDps {
        self.gyro
    }

    /// Die temperature in °C
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Accelerometer-only tilt angles in degrees
    pub const fn tilt(&self) -> TiltAngles {
        self.filter.tilt()
    }

    /// Gyro-integrated angles in degrees
    pub const fn gyro_angles(&self) -> GyroAngles {
        self.filter.gyro_angles()
    }

    /// Fused orientation
    pub const fn orientation(&self) -> Orientation {
        self.filter.orientation()
    }

    /// Pitch in degrees
    pub const fn pitch(&self) -> f32 {
        self.filter.orientation().pitch
    }

    /// Roll in degrees
    pub const fn roll(&self) -> f32 {
        self.filter.orientation().roll
    }

    /// Yaw in degrees
    pub const fn yaw(&self) -> f32 {
        self.filter.orientation().yaw
    }

    /// Cached accelerometer range (last set or read)
    pub const fn accel_sensitivity(&self) -> AccelSensitivity {
        self.accel_sensitivity
    }

    /// Cached gyroscope range (last set or read)
    pub const fn gyro_sensitivity(&self) -> GyroSensitivity {
        self.gyro_sensitivity
    }

    /// Accelerometer conversion factor in g/LSB
    pub const fn accel_scale(&self) -> f32 {
        self.raw2g
    }

    /// Gyroscope conversion factor in (°/s)/LSB
    pub const fn gyro_scale(&self) -> f32 {
        self.raw2dps
    }

    /// Accelerometer bias for one axis, in g
    pub const fn accel_offset(&self, axis: Axis) -> f32 {
        self.accel_offset.get(axis)
    }

    /// Set the accelerometer bias for one axis, in g
    pub fn set_accel_offset(&mut self, axis: Axis, value: f32) {
        self.accel_offset.set(axis, value);
    }

    /// All accelerometer biases
    pub const fn accel_offsets(&self) -> AccelOffset {
        self.accel_offset
    }

    /// Replace all accelerometer biases
    pub fn set_accel_offsets(&mut self, offset: AccelOffset) {
        self.accel_offset = offset;
    }

    /// Gyroscope bias for one axis, in °/s
    pub const fn gyro_offset(&self, axis: Axis) -> f32 {
        self.gyro_offset.get(axis)
    }

    /// Set the gyroscope bias for one axis, in °/s
    pub fn set_gyro_offset(&mut self, axis: Axis, value: f32) {
        self.gyro_offset.set(axis, value);
    }

    /// All gyroscope biases
    pub const fn gyro_offsets(&self) -> GyroOffset {
        self.gyro_offset
    }

    /// Replace all gyroscope biases
    pub fn set_gyro_offsets(&mut self, offset: GyroOffset) {
        self.gyro_offset = offset;
    }

    /// Enable or disable the throttle
    pub fn set_throttle(&mut self, enabled: bool) {
        self.throttle.set_enabled(enabled);
    }

    /// Whether the throttle is enabled
    pub const fn throttle_enabled(&self) -> bool {
        self.throttle.config().enabled
    }

    /// Set the minimum interval between samples in milliseconds
    pub fn set_throttle_time(&mut self, interval_ms: u16) {
        self.throttle.set_interval_ms(interval_ms);
    }

    /// Minimum interval between samples in milliseconds
    pub const fn throttle_time(&self) -> u16 {
        self.throttle.config().interval_ms
    }

    /// Current throttle configuration
    pub const fn throttle_config(&self) -> ThrottleConfig {
        self.throttle.config()
    }

    /// Replace the throttle configuration
    pub fn set_throttle_config(&mut self, config: ThrottleConfig) {
        self.throttle.set_config(config);
    }

    /// Consume the driver and return the interface and clock
    pub fn release(self) -> (I, C) {
        (self.device.interface.release(), self.clock)
    }

    /// Record an error as the last status and hand it back
    fn fail<E>(&mut self, error: Error<E>) -> Error<E> {
        if let Some(status) = error.status() {
            self.status = status;
        }
        error
    }

    /// Record the outcome of a register transaction as the last status
    fn record<T, E>(&mut self, result: Result<T, Error<E>>) -> Result<T, Error<E>> {
        match result {
            Ok(value) => {
                self.status = Status::Ok;
                Ok(value)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Store a new sensitivity and recompute the accelerometer factor
    fn apply_accel_sensitivity(&mut self, sensitivity: AccelSensitivity) {
        self.accel_sensitivity = sensitivity;
        self.raw2g = sensitivity.scale();
    }

    /// Store a new sensitivity and recompute the gyroscope factor
    fn apply_gyro_sensitivity(&mut self, sensitivity: GyroSensitivity) {
        self.gyro_sensitivity = sensitivity;
        self.raw2dps = sensitivity.scale();
    }

    /// Zero offsets and disable the throttle for calibration
    fn begin_calibration(&mut self) -> CalibrationSnapshot {
        let snapshot = CalibrationSnapshot {
            accel_offset: self.accel_offset,
            gyro_offset: self.gyro_offset,
            throttle: self.throttle.config(),
        };
        self.accel_offset = AccelOffset::default();
        self.gyro_offset = GyroOffset::default();
        self.throttle.set_enabled(false);
        snapshot
    }

    fn abort_calibration(&mut self, snapshot: CalibrationSnapshot) {
        self.accel_offset = snapshot.accel_offset;
        self.gyro_offset = snapshot.gyro_offset;
        self.throttle.set_config(snapshot.throttle);
    }

    fn finish_calibration(&mut self, snapshot: CalibrationSnapshot, sums: &BiasAccumulator) {
        let (accel_offset, gyro_offset) = sums.offsets();
        self.accel_offset = accel_offset;
        self.gyro_offset = gyro_offset;
        self.throttle.set_config(snapshot.throttle);
        self.filter.reset();
        self.last_us = None;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Calibrated: accel offset {} g, gyro offset {} dps",
            self.accel_offset,
            self.gyro_offset
        );
    }
}

impl<I, C: Clock> Gy521<I, C> {
    /// Throttle check; returns the sample time or `None` when skipped
    fn admit(&mut self, block: Block) -> Option<u32> {
        let now_ms = self.clock.now_ms();
        if block.is_throttled() && self.throttle.should_skip(now_ms) {
            self.status = Status::Throttled;
            return None;
        }
        Some(now_ms)
    }

    /// Decode and convert a block that was read successfully
    fn apply(&mut self, block: Block, buffer: &[u8; FULL_BLOCK_LEN], now_ms: u32) {
        match block {
            Block::Full => {
                self.raw = RawSample::from_be_bytes(buffer);
                self.convert_accel();
                self.convert_temperature();
                self.convert_gyro();
                self.filter.fuse();
            }
            Block::Accel => {
                self.raw.accel = AccelData::from_be_bytes(&buffer[..registers::ACCEL_BLOCK_LEN]);
                self.convert_accel();
            }
            Block::Gyro => {
                self.raw.gyro = GyroData::from_be_bytes(&buffer[..registers::GYRO_BLOCK_LEN]);
                self.convert_gyro();
                // Tilt is whatever the last accelerometer read left behind
                self.filter.fuse();
            }
            Block::Temperature => {
                self.raw.temperature = i16::from_be_bytes([buffer[0], buffer[1]]);
                self.convert_temperature();
            }
        }

        if block.is_throttled() {
            self.throttle.mark(now_ms);
        }
        self.status = Status::Ok;
    }

    fn convert_accel(&mut self) {
        self.accel = AccelDataG::from_raw(self.raw.accel.to_array(), self.raw2g, &self.accel_offset);
        self.filter.update_tilt(&self.accel);
    }

    fn convert_temperature(&mut self) {
        self.temperature = temperature::raw_to_celsius(self.raw.temperature);
    }

    #[allow(clippy::cast_precision_loss)]
    fn convert_gyro(&mut self) {
        let now_us = self.clock.now_us();
        let dt = self
            .last_us
            .map_or(0.0, |last| elapsed(now_us, last) as f32 * 1e-6);
        self.last_us = Some(now_us);

        self.gyro = GyroDataDps::from_raw(self.raw.gyro.to_array(), self.raw2dps, &self.gyro_offset);
        self.filter.integrate(&self.gyro, dt);
    }
}

#[cfg(not(feature = "async"))]
impl<I, C> Gy521<I, C>
where
    I: BusInterface,
    C: Clock,
{
    /// Initialize the bus, check the device answers, and wake it up
    ///
    /// `pins` selects explicit SDA/SCL pins on transports that support it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `pins` is given but the transport cannot assign pins
    /// - The bus cannot be initialized
    /// - The device does not acknowledge its address
    /// - The wake command is not acknowledged
    pub fn connect(&mut self, pins: Option<BusPins>) -> Result<(), Error<I::Error>> {
        let bus = self.device.interface.bus();
        if pins.is_some() && !bus.supports_pin_assignment() {
            return Err(self.fail(Error::UnsupportedPins));
        }
        if let Err(e) = bus.begin(pins) {
            return Err(self.fail(Error::Bus(e)));
        }

        if !self.is_connected() {
            #[cfg(feature = "defmt")]
            defmt::warn!("No GY-521 acknowledge at {=u8:#x}", self.address());
            return Err(Error::NotConnected);
        }

        self.wake()?;

        #[cfg(feature = "defmt")]
        defmt::info!("GY-521 at {=u8:#x} connected and awake", self.address());
        Ok(())
    }

    /// Check whether the device acknowledges its address
    pub fn is_connected(&mut self) -> bool {
        let address = self.address();
        let connected = self.device.interface.bus().probe(address).is_ok();
        self.status = if connected {
            Status::Ok
        } else {
            Status::NotConnected
        };
        connected
    }

    /// Clear the sleep bit in `PWR_MGMT_1`
    ///
    /// Writes the whole register, which also selects the internal oscillator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the write is not acknowledged.
    pub fn wake(&mut self) -> Result<(), Error<I::Error>> {
        let result = self.device.pwr_mgmt_1().write(|w| {
            w.set_sleep(false);
        });
        self.record(result)
    }

    /// Read accelerometer, temperature and gyroscope in one burst
    ///
    /// Converts all values, recomputes tilt, integrates the gyro and updates
    /// pitch, roll and yaw.
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    /// State is left untouched on error.
    pub fn read(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Full)
    }

    /// Read the accelerometer only
    ///
    /// Updates acceleration and tilt. Gyro state, the integration timestamp
    /// and orientation are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    pub fn read_accel(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Accel)
    }

    /// Read the gyroscope only
    ///
    /// Integrates the rate and updates orientation using the tilt from the
    /// most recent accelerometer read, which may be stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    pub fn read_gyro(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Gyro)
    }

    /// Read the temperature only; never throttled
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    pub fn read_temperature(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Temperature)
    }

    /// Set the accelerometer range
    ///
    /// Accepts an [`AccelSensitivity`] or a raw code (`0..=3`, larger values
    /// clamp to 3). The register is only written if the field differs; the
    /// self-test bits are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing `ACCEL_CONFIG` fails; the
    /// conversion factor is unchanged in that case.
    pub fn set_accel_sensitivity<S>(&mut self, sensitivity: S) -> Result<(), Error<I::Error>>
    where
        S: Into<AccelSensitivity>,
    {
        let sensitivity = sensitivity.into();
        let code = sensitivity.code();
        let result = self.device.accel_config().read();
        let config = self.record(result)?;

        if config.fs_sel() == code {
            #[cfg(feature = "defmt")]
            defmt::debug!("ACCEL_CONFIG already at {}, skipping write", sensitivity);
        } else {
            let result = self.device.accel_config().write(|w| {
                *w = config;
                w.set_fs_sel(code);
            });
            self.record(result)?;
        }

        self.apply_accel_sensitivity(sensitivity);
        Ok(())
    }

    /// Read the accelerometer range from the device and cache it
    ///
    /// The conversion factor is not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `ACCEL_CONFIG` fails.
    pub fn read_accel_sensitivity(&mut self) -> Result<AccelSensitivity, Error<I::Error>> {
        let result = self.device.accel_config().read();
        let config = self.record(result)?;
        self.accel_sensitivity = AccelSensitivity::from_code(config.fs_sel());
        Ok(self.accel_sensitivity)
    }

    /// Set the gyroscope range
    ///
    /// Accepts a [`GyroSensitivity`] or a raw code (`0..=3`, larger values
    /// clamp to 3). The register is only written if the field differs; the
    /// self-test bits are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing `GYRO_CONFIG` fails; the
    /// conversion factor is unchanged in that case.
    pub fn set_gyro_sensitivity<S>(&mut self, sensitivity: S) -> Result<(), Error<I::Error>>
    where
        S: Into<GyroSensitivity>,
    {
        let sensitivity = sensitivity.into();
        let code = sensitivity.code();
        let result = self.device.gyro_config().read();
        let config = self.record(result)?;

        if config.fs_sel() == code {
            #[cfg(feature = "defmt")]
            defmt::debug!("GYRO_CONFIG already at {}, skipping write", sensitivity);
        } else {
            let result = self.device.gyro_config().write(|w| {
                *w = config;
                w.set_fs_sel(code);
            });
            self.record(result)?;
        }

        self.apply_gyro_sensitivity(sensitivity);
        Ok(())
    }

    /// Read the gyroscope range from the device and cache it
    ///
    /// The conversion factor is not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `GYRO_CONFIG` fails.
    pub fn read_gyro_sensitivity(&mut self) -> Result<GyroSensitivity, Error<I::Error>> {
        let result = self.device.gyro_config().read();
        let config = self.record(result)?;
        self.gyro_sensitivity = GyroSensitivity::from_code(config.fs_sel());
        Ok(self.gyro_sensitivity)
    }

    /// Write one register
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the write is not acknowledged.
    pub fn write_register<R: Into<u8>>(
        &mut self,
        register: R,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        let result = self
            .device
            .interface
            .write_register(register.into(), 8, &[value]);
        self.record(result)
    }

    /// Read one register
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the read fails.
    pub fn read_register<R: Into<u8>>(&mut self, register: R) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        let result = self
            .device
            .interface
            .read_register(register.into(), 8, &mut buffer);
        self.record(result)?;
        Ok(buffer[0])
    }

    /// Estimate static bias offsets
    ///
    /// The device must be at rest with the Z axis pointing up. Takes
    /// `samples` full reads and sets offsets so the mean acceleration becomes
    /// (0, 0, 1) g and the mean rate (0, 0, 0) °/s. The throttle is bypassed
    /// during calibration and orientation state is zeroed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero samples, or the bus error of
    /// the failing read. On error the previous offsets are restored.
    pub fn calibrate<D>(&mut self, delay: &mut D, samples: u16) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let snapshot = self.begin_calibration();
        let mut sums = BiasAccumulator::default();
        for _ in 0..samples {
            if let Err(e) = self.sample(Block::Full) {
                self.abort_calibration(snapshot);
                return Err(e);
            }
            sums.add(&self.accel, &self.gyro);
            delay.delay_ms(CALIBRATION_SAMPLE_DELAY_MS);
        }
        self.finish_calibration(snapshot, &sums);
        Ok(())
    }

    fn sample(&mut self, block: Block) -> Result<SampleOutcome, Error<I::Error>> {
        let Some(now_ms) = self.admit(block) else {
            return Ok(SampleOutcome::Throttled);
        };

        let mut buffer = [0u8; FULL_BLOCK_LEN];
        let result = self.device.interface.read_register(
            block.start().addr(),
            block.size_bits(),
            &mut buffer[..block.len()],
        );
        self.record(result)?;
        self.apply(block, &buffer, now_ms);
        Ok(SampleOutcome::Fresh)
    }
}

#[cfg(feature = "async")]
impl<I, C> Gy521<I, C>
where
    I: AsyncBusInterface,
    C: Clock,
{
    /// Initialize the bus, check the device answers, and wake it up
    ///
    /// `pins` selects explicit SDA/SCL pins on transports that support it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `pins` is given but the transport cannot assign pins
    /// - The bus cannot be initialized
    /// - The device does not acknowledge its address
    /// - The wake command is not acknowledged
    pub async fn connect(&mut self, pins: Option<BusPins>) -> Result<(), Error<I::Error>> {
        let bus = self.device.interface.bus();
        if pins.is_some() && !bus.supports_pin_assignment() {
            return Err(self.fail(Error::UnsupportedPins));
        }
        if let Err(e) = bus.begin(pins).await {
            return Err(self.fail(Error::Bus(e)));
        }

        if !self.is_connected().await {
            #[cfg(feature = "defmt")]
            defmt::warn!("No GY-521 acknowledge at {=u8:#x}", self.address());
            return Err(Error::NotConnected);
        }

        self.wake().await?;

        #[cfg(feature = "defmt")]
        defmt::info!("GY-521 at {=u8:#x} connected and awake", self.address());
        Ok(())
    }

    /// Check whether the device acknowledges its address
    pub async fn is_connected(&mut self) -> bool {
        let address = self.address();
        let connected = self.device.interface.bus().probe(address).await.is_ok();
        self.status = if connected {
            Status::Ok
        } else {
            Status::NotConnected
        };
        connected
    }

    /// Clear the sleep bit in `PWR_MGMT_1`
    ///
    /// Writes the whole register, which also selects the internal oscillator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the write is not acknowledged.
    pub async fn wake(&mut self) -> Result<(), Error<I::Error>> {
        let result = self
            .device
            .pwr_mgmt_1()
            .write_async(|w| {
                w.set_sleep(false);
            })
            .await;
        self.record(result)
    }

    /// Read accelerometer, temperature and gyroscope in one burst
    ///
    /// Converts all values, recomputes tilt, integrates the gyro and updates
    /// pitch, roll and yaw.
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    /// State is left untouched on error.
    pub async fn read(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Full).await
    }

    /// Read the accelerometer only
    ///
    /// Updates acceleration and tilt. Gyro state, the integration timestamp
    /// and orientation are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    pub async fn read_accel(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Accel).await
    }

    /// Read the gyroscope only
    ///
    /// Integrates the rate and updates orientation using the tilt from the
    /// most recent accelerometer read, which may be stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    pub async fn read_gyro(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Gyro).await
    }

    /// Read the temperature only; never throttled
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the burst read fails.
    pub async fn read_temperature(&mut self) -> Result<SampleOutcome, Error<I::Error>> {
        self.sample(Block::Temperature).await
    }

    /// Set the accelerometer range
    ///
    /// Accepts an [`AccelSensitivity`] or a raw code (`0..=3`, larger values
    /// clamp to 3). The register is only written if the field differs; the
    /// self-test bits are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing `ACCEL_CONFIG` fails; the
    /// conversion factor is unchanged in that case.
    pub async fn set_accel_sensitivity<S>(&mut self, sensitivity: S) -> Result<(), Error<I::Error>>
    where
        S: Into<AccelSensitivity>,
    {
        let sensitivity = sensitivity.into();
        let code = sensitivity.code();
        let result = self.device.accel_config().read_async().await;
        let config = self.record(result)?;

        if config.fs_sel() == code {
            #[cfg(feature = "defmt")]
            defmt::debug!("ACCEL_CONFIG already at {}, skipping write", sensitivity);
        } else {
            let result = self
                .device
                .accel_config()
                .write_async(|w| {
                    *w = config;
                    w.set_fs_sel(code);
                })
                .await;
            self.record(result)?;
        }

        self.apply_accel_sensitivity(sensitivity);
        Ok(())
    }

    /// Read the accelerometer range from the device and cache it
    ///
    /// The conversion factor is not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `ACCEL_CONFIG` fails.
    pub async fn read_accel_sensitivity(&mut self) -> Result<AccelSensitivity, Error<I::Error>> {
        let result = self.device.accel_config().read_async().await;
        let config = self.record(result)?;
        self.accel_sensitivity = AccelSensitivity::from_code(config.fs_sel());
        Ok(self.accel_sensitivity)
    }

    /// Set the gyroscope range
    ///
    /// Accepts a [`GyroSensitivity`] or a raw code (`0..=3`, larger values
    /// clamp to 3). The register is only written if the field differs; the
    /// self-test bits are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing `GYRO_CONFIG` fails; the
    /// conversion factor is unchanged in that case.
    pub async fn set_gyro_sensitivity<S>(&mut self, sensitivity: S) -> Result<(), Error<I::Error>>
    where
        S: Into<GyroSensitivity>,
    {
        let sensitivity = sensitivity.into();
        let code = sensitivity.code();
        let result = self.device.gyro_config().read_async().await;
        let config = self.record(result)?;

        if config.fs_sel() == code {
            #[cfg(feature = "defmt")]
            defmt::debug!("GYRO_CONFIG already at {}, skipping write", sensitivity);
        } else {
            let result = self
                .device
                .gyro_config()
                .write_async(|w| {
                    *w = config;
                    w.set_fs_sel(code);
                })
                .await;
            self.record(result)?;
        }

        self.apply_gyro_sensitivity(sensitivity);
        Ok(())
    }

    /// Read the gyroscope range from the device and cache it
    ///
    /// The conversion factor is not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `GYRO_CONFIG` fails.
    pub async fn read_gyro_sensitivity(&mut self) -> Result<GyroSensitivity, Error<I::Error>> {
        let result = self.device.gyro_config().read_async().await;
        let config = self.record(result)?;
        self.gyro_sensitivity = GyroSensitivity::from_code(config.fs_sel());
        Ok(self.gyro_sensitivity)
    }

    /// Write one register
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the write is not acknowledged.
    pub async fn write_register<R: Into<u8>>(
        &mut self,
        register: R,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        let result = self
            .device
            .interface
            .write_register(register.into(), 8, &[value])
            .await;
        self.record(result)
    }

    /// Read one register
    ///
    /// # Errors
    ///
    /// Returns an error if the register select or the read fails.
    pub async fn read_register<R: Into<u8>>(&mut self, register: R) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        let result = self
            .device
            .interface
            .read_register(register.into(), 8, &mut buffer)
            .await;
        self.record(result)?;
        Ok(buffer[0])
    }

    /// Estimate static bias offsets
    ///
    /// The device must be at rest with the Z axis pointing up. Takes
    /// `samples` full reads and sets offsets so the mean acceleration becomes
    /// (0, 0, 1) g and the mean rate (0, 0, 0) °/s. The throttle is bypassed
    /// during calibration and orientation state is zeroed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero samples, or the bus error of
    /// the failing read. On error the previous offsets are restored.
    pub async fn calibrate<D>(&mut self, delay: &mut D, samples: u16) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let snapshot = self.begin_calibration();
        let mut sums = BiasAccumulator::default();
        for _ in 0..samples {
            if let Err(e) = self.sample(Block::Full).await {
                self.abort_calibration(snapshot);
                return Err(e);
            }
            sums.add(&self.accel, &self.gyro);
            delay.delay_ms(CALIBRATION_SAMPLE_DELAY_MS).await;
        }
        self.finish_calibration(snapshot, &sums);
        Ok(())
    }

    async fn sample(&mut self, block: Block) -> Result<SampleOutcome, Error<I::Error>> {
        let Some(now_ms) = self.admit(block) else {
            return Ok(SampleOutcome::Throttled);
        };

        let mut buffer = [0u8; FULL_BLOCK_LEN];
        let result = self
            .device
            .interface
            .read_register(
                block.start().addr(),
                block.size_bits(),
                &mut buffer[..block.len()],
            )
            .await;
        self.record(result)?;
        self.apply(block, &buffer, now_ms);
        Ok(SampleOutcome::Fresh)
    }
}
