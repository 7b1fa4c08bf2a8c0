//! Bounded wait for the display element to report a size.
//!
//! The browser lays the image out asynchronously, so right after the image
//! element loads its size may still be zero. The driver polls on a timer;
//! this type only keeps count and decides when to give up.

use crate::decode::LoadError;
use crate::geometry::Dimensions;

/// Retries allowed after the first check before the load is declared failed.
pub const MAX_READINESS_RETRIES: u32 = 40;

/// Delay between checks, in milliseconds.
pub const READINESS_INTERVAL_MS: u32 = 50;

/// Outcome of one readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The display has a usable size.
    Ready(Dimensions),
    /// Check again after [`READINESS_INTERVAL_MS`].
    Retry,
}

#[derive(Debug, Clone, Default)]
pub struct ReadinessPoll {
    retries: u32,
}

impl ReadinessPoll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of the display size.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotReady` once the retry budget is used up.
    pub fn check(&mut self, display: Dimensions) -> Result<Readiness, LoadError> {
        if self.retries > MAX_READINESS_RETRIES {
            return Err(LoadError::NotReady {
                attempts: self.retries,
            });
        }
        if display.width > 0 {
            return Ok(Readiness::Ready(display));
        }
        self.retries += 1;
        Ok(Readiness::Retry)
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}
