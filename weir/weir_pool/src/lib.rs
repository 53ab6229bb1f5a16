#![deny(warnings)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Weir Pool
//!
//! Thread-safe, size-bounded blocking connection pool.
//!
//! The pool maintains a fixed number of capacity slots. A caller that finds
//! every connection checked out blocks, up to a configurable timeout, until
//! another caller releases one, rather than failing immediately. This lets
//! many short-lived operations share a small number of expensive-to-establish
//! backend connections while tolerating bursts of demand beyond capacity.
//!
//! Connections are established lazily: the slot queue starts full of empty
//! placeholders, and a real connection is only built when an acquire dequeues
//! a placeholder with no warm connection ahead of it. Because the queue is
//! last-in-first-out by default, released connections are handed out before
//! remaining placeholders, so at most `capacity` connections are ever built
//! per pool generation and usually far fewer.
//!
//! Carrying a pool across a process duplication (fork) is detected through
//! the owning execution-context identity: the next operation tears down the
//! inherited connections, which share no usable socket state with the new
//! process, and rebuilds the pool in place.
//!
//! ## Integration with weir_core
//!
//! - Connections and their factory are the boundary traits in
//!   [`weir_core::traits`]
//! - Failures surface through [`weir_core::error`], keeping pool exhaustion
//!   distinguishable from backend connectivity errors

/// Pool configuration and slot queue discipline
pub mod config;

/// The blocking pool, its generations, and checked-out connection handles
pub mod pool;

mod queue;

// Re-export key types for easier access
pub use config::{PoolConfig, QueueDiscipline};
pub use pool::{BlockingPool, ConnectionHandle};
