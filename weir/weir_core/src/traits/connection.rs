//! Connection boundary traits.
//!
//! The pool never looks inside a connection. It needs exactly two
//! capabilities at this boundary: building a new connection on demand, and
//! closing one that is no longer wanted. Handshake, authentication, and
//! command serialization all live behind these traits.

use crate::error::ConnectError;

/// An established backend connection.
///
/// Implementations own whatever socket or session state the backend
/// requires. The pool only ever asks a connection to tear itself down.
///
/// # Examples
///
/// ```
/// use weir_core::error::ConnectError;
/// use weir_core::traits::connection::Connection;
///
/// struct Backend {
///     open: bool,
/// }
///
/// impl Connection for Backend {
///     fn teardown(&mut self) -> Result<(), ConnectError> {
///         self.open = false;
///         Ok(())
///     }
/// }
/// ```
pub trait Connection: Send + 'static {
    /// Tear down the underlying resource.
    ///
    /// Failure must be tolerated by callers that hold many connections: the
    /// pool logs and continues when a teardown fails during bulk cleanup,
    /// because the resource may already be dead or unreachable.
    fn teardown(&mut self) -> Result<(), ConnectError>;
}

/// A capability that builds new connections on demand.
///
/// Implementations carry their configuration (address, credentials,
/// database index, and so on) as explicit struct fields; the pool passes
/// nothing through at establish time.
///
/// # Examples
///
/// ```
/// use weir_core::error::ConnectError;
/// use weir_core::traits::connection::{ConnectFactory, Connection};
///
/// struct Backend;
///
/// impl Connection for Backend {
///     fn teardown(&mut self) -> Result<(), ConnectError> {
///         Ok(())
///     }
/// }
///
/// struct BackendFactory {
///     host: String,
///     port: u16,
/// }
///
/// impl ConnectFactory for BackendFactory {
///     type Conn = Backend;
///
///     fn establish(&self) -> Result<Backend, ConnectError> {
///         // A real implementation would dial self.host:self.port here.
///         Ok(Backend)
///     }
/// }
///
/// let factory = BackendFactory { host: "localhost".into(), port: 6379 };
/// let conn = factory.establish().unwrap();
/// # drop(conn);
/// ```
pub trait ConnectFactory: Send + Sync + 'static {
    /// The connection type this factory builds.
    type Conn: Connection;

    /// Establish a new connection.
    ///
    /// Either returns a usable connection or fails with
    /// [`ConnectError::Establish`]. The pool has no retry policy of its
    /// own, so the error propagates to the acquiring caller.
    fn establish(&self) -> Result<Self::Conn, ConnectError>;
}
