//! Error types for the weir connection pool.
//!
//! This module defines the error hierarchy shared by all weir crates. The
//! errors are organized by concern: configuration problems are fatal at
//! construction time, pool exhaustion is a recoverable signal the caller may
//! retry, and connection errors mean the backend itself misbehaved.
//!
//! The root error type, `Error`, can wrap any of the concern-specific
//! errors, allowing for uniform error handling at the top level while
//! keeping "the pool is busy" and "the backend is down" distinguishable.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the weir pool.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors, fatal at construction time
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pool acquisition errors
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// Errors from the underlying connection resource
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectError),
}

impl Error {
    /// Whether this error is a pool-exhaustion timeout.
    ///
    /// Exhaustion means every connection was checked out and none became
    /// available within the configured wait; retrying later is reasonable.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Pool(PoolError::Exhausted(_)))
    }

    /// Whether this error originates from the backend connection itself.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Errors raised while validating pool configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pool capacity must be a positive integer
    #[error("pool capacity must be a positive integer, got {0}")]
    InvalidCapacity(usize),
}

/// Errors raised by pool acquisition.
#[derive(Debug, Error)]
pub enum PoolError {
    /// No connection became available within the configured wait
    #[error("no connection available after waiting {0:?}")]
    Exhausted(Duration),
}

/// Errors raised at the connection resource boundary.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The factory failed to establish a new connection
    #[error("failed to establish connection: {0}")]
    Establish(String),

    /// Tearing down the underlying resource failed
    #[error("failed to tear down connection: {0}")]
    Teardown(String),
}

/// Result type used throughout the weir crates.
pub type Result<T> = std::result::Result<T, Error>;
