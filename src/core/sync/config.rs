/*!
 * List Configuration
 *
 * Runtime configuration for the change-notification channel
 */

use tracing::warn;

/// Default number of buffered change pulses
///
/// Only coalescing depends on this value: a drain re-enters its wait loop
/// on every pulse, so any small capacity is correct.
pub const DEFAULT_NOTIFY_CAPACITY: usize = 8;

/// Environment variable read by [`ListConfig::from_env`]
pub const NOTIFY_CAPACITY_ENV: &str = "LIST_NOTIFY_CAPACITY";

/// List configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    /// Capacity of the change-notification channel (0 is treated as 1)
    pub notify_capacity: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
        }
    }
}

impl ListConfig {
    /// Single-slot channel: every burst of changes collapses into one pulse
    pub const fn coalescing() -> Self {
        Self { notify_capacity: 1 }
    }

    /// Larger channel for bursty producers
    pub const fn buffered() -> Self {
        Self {
            notify_capacity: 64,
        }
    }

    pub const fn with_notify_capacity(mut self, capacity: usize) -> Self {
        self.notify_capacity = capacity;
        self
    }

    /// Capacity actually used for the channel
    #[inline]
    pub fn effective_capacity(&self) -> usize {
        self.notify_capacity.max(1)
    }

    /// Load configuration from the environment
    ///
    /// Falls back to defaults when `LIST_NOTIFY_CAPACITY` is unset or invalid.
    pub fn from_env() -> Self {
        match std::env::var(NOTIFY_CAPACITY_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(capacity) => Self::default().with_notify_capacity(capacity),
                Err(e) => {
                    warn!(value = %raw, error = %e, "Invalid {}, using default", NOTIFY_CAPACITY_ENV);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
