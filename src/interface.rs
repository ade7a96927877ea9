//! Bus interface for the GY-521
//!
//! The driver talks to the sensor through [`BusInterface`] (or
//! [`AsyncBusInterface`] with the `async` feature). The traits mirror the
//! transaction shape the MPU-6050 expects: a short write that selects the
//! starting register, terminated by a STOP, followed by a separate read of a
//! fixed number of bytes.
//!
//! [`I2cInterface`] adapts any `embedded-hal` I2C peripheral. Custom
//! transports (bit-banged buses, bridges, test doubles) implement the traits
//! directly.
//!
//! [`DeviceInterface`] binds a transport to a device address and implements
//! the `device-driver` register interfaces on top of it, splitting failures
//! into register select ([`Error::Write`]), read ([`Error::Read`]) and byte
//! count ([`Error::ShortRead`]).

use crate::Error;

/// Longest register write (data bytes, pointer excluded)
const MAX_WRITE_LEN: usize = 8;

/// Explicit SDA/SCL pin assignment for transports that can route the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusPins {
    /// Data line pin number
    pub sda: u8,
    /// Clock line pin number
    pub scl: u8,
}

impl BusPins {
    /// Create a pin pair
    #[must_use]
    pub const fn new(sda: u8, scl: u8) -> Self {
        Self { sda, scl }
    }
}

/// Blocking two-wire transport
pub trait BusInterface {
    /// Transport error
    type Error;

    /// Bring the bus up, optionally on explicit pins
    ///
    /// Only called with `Some(pins)` when [`supports_pin_assignment`]
    /// returns `true`.
    ///
    /// [`supports_pin_assignment`]: BusInterface::supports_pin_assignment
    ///
    /// # Errors
    ///
    /// Returns the transport error if the bus cannot be initialized.
    fn begin(&mut self, pins: Option<BusPins>) -> Result<(), Self::Error> {
        let _ = pins;
        Ok(())
    }

    /// Whether [`begin`](BusInterface::begin) accepts explicit pins
    fn supports_pin_assignment(&self) -> bool {
        false
    }

    /// Address-only transaction; `Ok` means the device acknowledged
    ///
    /// # Errors
    ///
    /// Returns the transport error on NACK or bus failure.
    fn probe(&mut self, address: u8) -> Result<(), Self::Error>;

    /// Write `bytes` in one transaction terminated by STOP
    ///
    /// # Errors
    ///
    /// Returns the transport error on NACK or bus failure.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Request `buffer.len()` bytes; returns how many were received
    ///
    /// # Errors
    ///
    /// Returns the transport error on NACK or bus failure.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: BusInterface + ?Sized> BusInterface for &mut T {
    type Error = T::Error;

    fn begin(&mut self, pins: Option<BusPins>) -> Result<(), Self::Error> {
        (**self).begin(pins)
    }

    fn supports_pin_assignment(&self) -> bool {
        (**self).supports_pin_assignment()
    }

    fn probe(&mut self, address: u8) -> Result<(), Self::Error> {
        (**self).probe(address)
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(address, buffer)
    }
}

/// Async two-wire transport
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncBusInterface {
    /// Transport error
    type Error;

    /// Bring the bus up, optionally on explicit pins
    ///
    /// # Errors
    ///
    /// Returns the transport error if the bus cannot be initialized.
    async fn begin(&mut self, pins: Option<BusPins>) -> Result<(), Self::Error> {
        let _ = pins;
        Ok(())
    }

    /// Whether [`begin`](AsyncBusInterface::begin) accepts explicit pins
    fn supports_pin_assignment(&self) -> bool {
        false
    }

    /// Address-only transaction; `Ok` means the device acknowledged
    ///
    /// # Errors
    ///
    /// Returns the transport error on NACK or bus failure.
    async fn probe(&mut self, address: u8) -> Result<(), Self::Error>;

    /// Write `bytes` in one transaction terminated by STOP
    ///
    /// # Errors
    ///
    /// Returns the transport error on NACK or bus failure.
    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Request `buffer.len()` bytes; returns how many were received
    ///
    /// # Errors
    ///
    /// Returns the transport error on NACK or bus failure.
    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

/// `embedded-hal` I2C adapter
///
/// The peripheral is already configured by the HAL when it is handed over,
/// so pin assignment through [`BusInterface::begin`] is not supported.
/// Pass `&mut i2c` to keep ownership of the peripheral.
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    /// Wrap an I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c);
    /// let mut imu = Gy521::new(interface, clock, I2C_ADDRESS_AD0_LOW);
    /// ```
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> BusInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn probe(&mut self, address: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[])
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        // embedded-hal reads either fill the buffer or fail
        self.i2c.read(address, buffer)?;
        Ok(buffer.len())
    }
}

#[cfg(feature = "async")]
impl<I2C, E> AsyncBusInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;

    async fn probe(&mut self, address: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[]).await
    }

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes).await
    }

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(address, buffer).await?;
        Ok(buffer.len())
    }
}

/// Transport bound to one device address
///
/// Implements `device_driver::RegisterInterface` over [`BusInterface`] and,
/// with the `async` feature, `device_driver::AsyncRegisterInterface` over
/// `AsyncBusInterface`.
/// Register reads select the register with its own STOP-terminated write,
/// then read `size_bits / 8` bytes.
pub struct DeviceInterface<I> {
    bus: I,
    address: u8,
}

impl<I> DeviceInterface<I> {
    /// Bind `bus` to the device at `address`
    pub const fn new(bus: I, address: u8) -> Self {
        Self { bus, address }
    }

    /// Device address on the bus
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Mutable access to the transport
    pub fn bus(&mut self) -> &mut I {
        &mut self.bus
    }

    /// Consume the interface and return the transport
    pub fn release(self) -> I {
        self.bus
    }
}

/// Map the byte count of a completed read onto `ShortRead`
fn check_count<E>(expected: usize, received: usize) -> Result<(), Error<E>> {
    if received == expected {
        return Ok(());
    }

    #[cfg(feature = "defmt")]
    defmt::warn!("Short read: expected {} bytes, got {}", expected, received);
    Err(Error::ShortRead { expected, received })
}

/// Register pointer followed by the data, truncated to [`MAX_WRITE_LEN`]
fn frame(address: u8, write_data: &[u8]) -> ([u8; MAX_WRITE_LEN + 1], usize) {
    let mut buffer = [0u8; MAX_WRITE_LEN + 1];
    buffer[0] = address;
    let len = write_data.len().min(MAX_WRITE_LEN);
    buffer[1..=len].copy_from_slice(&write_data[..len]);
    (buffer, len + 1)
}

impl<I: BusInterface> device_driver::RegisterInterface for DeviceInterface<I> {
    type Error = Error<I::Error>;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        self.bus
            .write(self.address, &[address])
            .map_err(Error::Write)?;
        let received = self
            .bus
            .read(self.address, read_data)
            .map_err(Error::Read)?;
        check_count(read_data.len(), received)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = frame(address, write_data);
        self.bus
            .write(self.address, &buffer[..len])
            .map_err(Error::Write)
    }
}

#[cfg(feature = "async")]
impl<I: AsyncBusInterface> device_driver::AsyncRegisterInterface for DeviceInterface<I> {
    type Error = Error<I::Error>;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        self.bus
            .write(self.address, &[address])
            .await
            .map_err(Error::Write)?;
        let received = self
            .bus
            .read(self.address, read_data)
            .await
            .map_err(Error::Read)?;
        check_count(read_data.len(), received)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = frame(address, write_data);
        self.bus
            .write(self.address, &buffer[..len])
            .await
            .map_err(Error::Write)
    }
}
