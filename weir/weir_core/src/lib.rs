//! # Weir Core
//!
//! `weir_core` provides the foundational building blocks shared by the weir
//! connection-pool crates: error types, identifier types, and the boundary
//! traits the pool depends on.
//!
//! ## Design Principles
//!
//! 1. **Opaque connections**: the pool never interprets what a connection
//!    is. Handshake, authentication, and command serialization all live
//!    behind the [`Connection`] and [`ConnectFactory`] traits; the pool only
//!    needs "establish" and "tear down".
//!
//! 2. **Injected identity**: the execution-context identity used for
//!    fork-safety is a capability ([`IdentitySource`]) handed to the pool,
//!    not a global read. Embedders and tests substitute their own source.
//!
//! 3. **Distinguishable failure**: a caller that cannot get a connection
//!    must be able to tell "the pool is busy" from "the backend is down",
//!    because the two call for different retry strategies.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all weir components
//! - **id**: Strongly-typed identifier types
//! - **traits**: The connection and identity boundaries

pub mod error;
pub mod id;
pub mod traits;

// Re-export key types and traits for convenience
pub use error::{ConfigError, ConnectError, Error, PoolError, Result};
pub use id::{ConnectionId, ContextId};
pub use traits::{ConnectFactory, Connection, IdentitySource, ProcessIdentity};
