//! Configuration for a blocking connection pool.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use weir_core::error::ConfigError;

/// Ordering discipline for the slot queue.
///
/// The default is last-in-first-out: the most recently released connection
/// is handed out next, ahead of any still-empty placeholders, so warm
/// connections are preferred and the pool only establishes as many distinct
/// connections as concurrent demand actually requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueDiscipline {
    /// Most recently released slot first (the default).
    Lifo,

    /// Oldest slot first.
    Fifo,
}

impl Default for QueueDiscipline {
    fn default() -> Self {
        Self::Lifo
    }
}

/// Configuration for a blocking connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Total number of connections the pool will ever hand out at once.
    pub capacity: usize,

    /// How long an acquire may block waiting for a slot.
    ///
    /// `None` blocks forever.
    pub wait_timeout: Option<Duration>,

    /// Ordering discipline for the slot queue.
    pub discipline: QueueDiscipline,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            wait_timeout: Some(Duration::from_secs(20)),
            discipline: QueueDiscipline::default(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the acquisition wait timeout.
    ///
    /// `None` makes acquires block forever.
    pub fn wait_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.wait_timeout = timeout.into();
        self
    }

    /// Set the slot queue discipline.
    pub fn discipline(mut self, discipline: QueueDiscipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Validate the configuration.
    ///
    /// The fill-up algorithm seeds the queue with exactly `capacity` empty
    /// slots, so the capacity must be a positive integer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}
