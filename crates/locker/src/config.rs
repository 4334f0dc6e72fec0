//! Locker configuration.

use locker_core::{Iterations, KdfParams};

/// Configuration for a locker session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockerConfig {
    /// Parameters used for new records and for unlocking payloads that
    /// carry none of their own.
    pub kdf: KdfParams,
}

impl LockerConfig {
    /// Override the PBKDF2 iteration count.
    pub fn with_iterations(mut self, iterations: Iterations) -> Self {
        self.kdf.iterations = iterations;
        self
    }
}
