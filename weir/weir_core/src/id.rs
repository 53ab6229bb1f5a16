//! Strongly-typed identifiers for the weir connection pool.
//!
//! Two identities matter to the pool: which established connection a log
//! line or teardown report refers to, and which execution context a pool
//! instance currently runs in. Both are thin typed wrappers so they cannot
//! be mixed up with each other or with arbitrary integers.
//!
//! # Examples
//!
//! ```
//! use weir_core::id::{ConnectionId, ContextId};
//!
//! let a = ConnectionId::new();
//! let b = ConnectionId::new();
//! assert_ne!(a, b);
//!
//! let ctx = ContextId::from_raw(42);
//! assert_eq!(ctx.as_raw(), 42);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for one established connection.
///
/// Assigned when the factory builds the connection. Used only in log lines
/// and teardown reporting; reuse decisions never consult it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the execution context a pool was constructed in.
///
/// Wraps the owning process identifier. Two pools observed from different
/// processes (for example across a fork) see different `ContextId`s, which
/// is what invalidates inherited socket state: the duplicated descriptors
/// share no usable connection with the original process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(u64);

impl ContextId {
    /// Wrap a raw context identifier.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
