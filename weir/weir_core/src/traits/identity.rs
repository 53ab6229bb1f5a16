//! Execution-context identity.
//!
//! A pool captures the identity of the context it was constructed in and
//! compares it at the start of every operation. When the identity changes
//! (the classic case is a process fork carrying the pool object into a
//! child that shares no socket state with the parent), every existing
//! connection is invalid and the pool must rebuild itself before handing
//! anything out.
//!
//! Identity is injected as a capability rather than read from a global so
//! that embedders and tests can substitute their own source.

use crate::id::ContextId;

/// Source of the current execution-context identity.
///
/// # Examples
///
/// ```
/// use weir_core::id::ContextId;
/// use weir_core::traits::identity::IdentitySource;
///
/// struct Fixed(u64);
///
/// impl IdentitySource for Fixed {
///     fn current(&self) -> ContextId {
///         ContextId::from_raw(self.0)
///     }
/// }
///
/// assert_eq!(Fixed(7).current(), ContextId::from_raw(7));
/// ```
pub trait IdentitySource: Send + Sync + 'static {
    /// The identity of the calling execution context.
    fn current(&self) -> ContextId;
}

/// The default identity source: the operating-system process id.
///
/// # Examples
///
/// ```
/// use weir_core::traits::identity::{IdentitySource, ProcessIdentity};
///
/// // Stable within one process.
/// assert_eq!(ProcessIdentity.current(), ProcessIdentity.current());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdentity;

impl IdentitySource for ProcessIdentity {
    fn current(&self) -> ContextId {
        ContextId::from_raw(u64::from(std::process::id()))
    }
}
