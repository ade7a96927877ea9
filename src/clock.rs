//! Time source used for throttling and gyro integration
//!
//! The driver needs two monotonic counters: milliseconds for the throttle
//! window and microseconds for the integration step. Both are `u32` and are
//! expected to wrap; the driver only ever looks at wrapping differences.

/// Monotonic millisecond/microsecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (wrapping)
    fn now_ms(&self) -> u32;

    /// Microseconds since an arbitrary epoch (wrapping)
    fn now_us(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}

/// Elapsed time between two wrapping timestamps
#[must_use]
pub const fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// [`Clock`] backed by `embassy_time::Instant`
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn now_us(&self) -> u32 {
        embassy_time::Instant::now().as_micros() as u32
    }
}
