//! Boundary traits for the weir connection pool.
//!
//! The pool treats a connection as an opaque resource handle: it can ask a
//! factory to build one, and it can ask a connection to tear itself down.
//! Everything else about the wire protocol is the implementor's business.
//! The execution-context identity used for fork-safety is likewise a trait,
//! injected at construction rather than read from a global.

pub mod connection;
pub mod identity;

// Re-export the boundary traits
pub use connection::{ConnectFactory, Connection};
pub use identity::{IdentitySource, ProcessIdentity};
