//! Sampling rate limiter
//!
//! When enabled, a sampling call made less than `interval_ms` after the last
//! accepted sample is skipped. Skipping is not an error: the driver reports
//! [`SampleOutcome::Throttled`] and leaves all state untouched.
//!
//! [`SampleOutcome::Throttled`]: crate::SampleOutcome::Throttled

use crate::clock::elapsed;

/// Default minimum interval between samples, in milliseconds
pub const DEFAULT_THROTTLE_MS: u16 = 10;

/// Throttle configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThrottleConfig {
    /// Skip samples that come too soon
    pub enabled: bool,
    /// Minimum interval between accepted samples in milliseconds
    pub interval_ms: u16,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: DEFAULT_THROTTLE_MS,
        }
    }
}

/// Throttle state: configuration plus the time of the last accepted sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Throttle {
    config: ThrottleConfig,
    last_ms: Option<u32>,
}

impl Throttle {
    /// Throttle with the given configuration and no sample taken yet
    #[must_use]
    pub const fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            last_ms: None,
        }
    }

    /// `true` if a sample at `now_ms` must be skipped
    #[must_use]
    pub fn should_skip(&self, now_ms: u32) -> bool {
        self.config.enabled
            && self
                .last_ms
                .is_some_and(|last| elapsed(now_ms, last) < u32::from(self.config.interval_ms))
    }

    /// Record an accepted sample at `now_ms`
    pub fn mark(&mut self, now_ms: u32) {
        self.last_ms = Some(now_ms);
    }

    /// Forget the last sample time; the next sample is always accepted
    pub fn clear(&mut self) {
        self.last_ms = None;
    }

    /// Enable or disable throttling
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Set the minimum interval in milliseconds
    pub fn set_interval_ms(&mut self, interval_ms: u16) {
        self.config.interval_ms = interval_ms;
    }

    /// Replace the configuration, keeping the last sample time
    pub fn set_config(&mut self, config: ThrottleConfig) {
        self.config = config;
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> ThrottleConfig {
        self.config
    }

    /// Time of the last accepted sample, if any
    #[must_use]
    pub const fn last_ms(&self) -> Option<u32> {
        self.last_ms
    }
}
