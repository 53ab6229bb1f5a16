//! The blocking connection pool.
//!
//! A [`BlockingPool`] hands out connections built by a
//! [`ConnectFactory`](weir_core::traits::connection::ConnectFactory),
//! blocking callers when every connection is checked out instead of failing
//! immediately. All pool state lives in a *generation*: the slot queue plus
//! the registry of every connection that generation has established. An
//! execution-context identity change (a fork carrying the pool into a new
//! process) retires the whole generation and installs a fresh one, because
//! the inherited connections share no usable socket state.

use log::{debug, info, trace, warn};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};

use weir_core::error::{PoolError, Result};
use weir_core::id::{ConnectionId, ContextId};
use weir_core::traits::connection::{ConnectFactory, Connection};
use weir_core::traits::identity::{IdentitySource, ProcessIdentity};

use crate::config::PoolConfig;
use crate::queue::{Slot, SlotQueue};

/// An established connection tracked by the pool.
///
/// The registry and the checked-out handle alias the same entry, so bulk
/// teardown can reach connections that are currently in use.
struct LiveConnection<C> {
    id: ConnectionId,
    conn: Mutex<C>,
}

type SharedConn<C> = Arc<LiveConnection<C>>;

/// One pool generation: the state between two (re)construction events.
struct Generation<C> {
    /// Identity of the execution context this generation was built in.
    owner: ContextId,

    /// The bounded slot queue, seeded with `capacity` empty slots.
    slots: SlotQueue<SharedConn<C>>,

    /// Every connection this generation has established, in creation order.
    /// Used only for bulk teardown, never for reuse decisions.
    live: Mutex<Vec<SharedConn<C>>>,
}

impl<C: Connection> Generation<C> {
    fn new(config: &PoolConfig, owner: ContextId) -> Self {
        Self {
            owner,
            slots: SlotQueue::new(config.capacity, config.discipline),
            live: Mutex::new(Vec::new()),
        }
    }

    /// Tear down every registered connection, best effort.
    ///
    /// Each failure is independent: it is logged and does not abort the
    /// teardown of the remaining connections.
    fn teardown_all(&self) {
        let live = self.live.lock();
        for shared in live.iter() {
            if let Err(e) = shared.conn.lock().teardown() {
                debug!("teardown of connection {} failed: {}", shared.id, e);
            }
        }
    }
}

/// Shared state behind every clone of a [`BlockingPool`].
struct PoolShared<F: ConnectFactory> {
    config: PoolConfig,
    factory: F,
    identity: Box<dyn IdentitySource>,
    generation: RwLock<Arc<Generation<F::Conn>>>,

    /// Serializes the check-and-recreate step so exactly one caller
    /// rebuilds the pool after an identity change.
    recreate_lock: Mutex<()>,
}

impl<F: ConnectFactory> PoolShared<F> {
    /// Identity check: return the current generation, rebuilding the pool
    /// first if the execution context has changed since it was built.
    fn current_generation(&self) -> Arc<Generation<F::Conn>> {
        let current = self.identity.current();
        {
            let generation = self.generation.read();
            if generation.owner == current {
                return Arc::clone(&generation);
            }
        }
        self.recreate(current)
    }

    /// Serialized teardown-and-rebuild after an identity change.
    fn recreate(&self, current: ContextId) -> Arc<Generation<F::Conn>> {
        let _serial = self.recreate_lock.lock();

        // Double check under the serializer: another caller may already
        // have rebuilt the pool.
        let stale = {
            let generation = self.generation.read();
            if generation.owner == current {
                return Arc::clone(&generation);
            }
            Arc::clone(&generation)
        };

        warn!(
            "execution context changed from {} to {}, rebuilding pool",
            stale.owner, current
        );

        // The inherited connections share no usable socket state with this
        // context; teardown failures are expected and swallowed.
        stale.teardown_all();

        let fresh = Arc::new(Generation::new(&self.config, current));
        *self.generation.write() = Arc::clone(&fresh);
        fresh
    }

    /// Return a connection to the current generation's queue.
    fn release_conn(&self, conn: SharedConn<F::Conn>) {
        let generation = self.current_generation();
        let id = conn.id;
        if let Err(slot) = generation.slots.offer(Slot::Occupied(conn)) {
            // A full queue is only possible across a recreation race or
            // caller misuse; the connection is not safe to reuse. Close it
            // rather than leak the underlying resource.
            debug!("slot queue full on release, tearing down connection {}", id);
            if let Slot::Occupied(conn) = slot {
                if let Err(e) = conn.conn.lock().teardown() {
                    debug!("teardown of connection {} failed: {}", id, e);
                }
            }
        } else {
            trace!("connection {} returned to pool", id);
        }
    }
}

/// Thread-safe blocking connection pool.
///
/// Rather than failing immediately when every connection is checked out,
/// [`acquire`](Self::acquire) blocks until a connection is released or the
/// configured wait expires. Connections are established lazily and reused
/// last-in-first-out, so the pool only builds as many distinct connections
/// as concurrent demand requires, never more than the configured capacity
/// per generation.
///
/// Cloning the pool is cheap; every clone shares the same state.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use weir_core::error::ConnectError;
/// use weir_core::traits::connection::{ConnectFactory, Connection};
/// use weir_pool::{BlockingPool, PoolConfig};
///
/// struct Backend;
///
/// impl Connection for Backend {
///     fn teardown(&mut self) -> Result<(), ConnectError> {
///         Ok(())
///     }
/// }
///
/// struct BackendFactory;
///
/// impl ConnectFactory for BackendFactory {
///     type Conn = Backend;
///
///     fn establish(&self) -> Result<Backend, ConnectError> {
///         Ok(Backend)
///     }
/// }
///
/// let config = PoolConfig::new()
///     .capacity(4)
///     .wait_timeout(Duration::from_secs(5));
/// let pool = BlockingPool::new(config, BackendFactory).unwrap();
///
/// let conn = pool.acquire("GET", &["greeting"]).unwrap();
/// // ... use the connection ...
/// drop(conn); // returned to the pool
/// # assert_eq!(pool.available_count(), 4);
/// ```
pub struct BlockingPool<F: ConnectFactory> {
    shared: Arc<PoolShared<F>>,
}

impl<F: ConnectFactory> Clone for BlockingPool<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F: ConnectFactory> BlockingPool<F> {
    /// Create a pool owned by the current operating-system process.
    ///
    /// No connection is established yet; the first acquires past the warm
    /// ones build connections on demand.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidCapacity`](weir_core::error::ConfigError) if
    /// the configured capacity is zero.
    pub fn new(config: PoolConfig, factory: F) -> Result<Self> {
        Self::with_identity(config, factory, ProcessIdentity)
    }

    /// Create a pool with an injected execution-context identity source.
    ///
    /// Embedders with their own notion of execution context (and tests
    /// simulating a fork) substitute their source here; [`Self::new`] uses
    /// the operating-system process id.
    pub fn with_identity(
        config: PoolConfig,
        factory: F,
        identity: impl IdentitySource,
    ) -> Result<Self> {
        config.validate()?;
        let identity: Box<dyn IdentitySource> = Box::new(identity);
        let owner = identity.current();
        let generation = Arc::new(Generation::new(&config, owner));
        info!(
            "pool created with capacity {} in context {}",
            config.capacity, owner
        );
        Ok(Self {
            shared: Arc::new(PoolShared {
                config,
                factory,
                identity,
                generation: RwLock::new(generation),
                recreate_lock: Mutex::new(()),
            }),
        })
    }

    /// Acquire a connection, blocking until one is available.
    ///
    /// `command` and `args` describe the operation the caller is about to
    /// run; they are logged for telemetry and never interpreted by the
    /// pool.
    ///
    /// A warm connection is returned directly. Dequeuing an empty
    /// placeholder instead triggers exactly one synchronous build through
    /// the factory, so one generation never establishes more than
    /// `capacity` connections.
    ///
    /// # Errors
    ///
    /// [`PoolError::Exhausted`] if no slot freed up within the configured
    /// wait, and [`ConnectError::Establish`](weir_core::error::ConnectError)
    /// if a new connection had to be built and the factory failed. The two
    /// stay distinct so callers can retry a busy pool but back off from a
    /// down backend.
    pub fn acquire(&self, command: &str, args: &[&str]) -> Result<ConnectionHandle<F>> {
        let generation = self.shared.current_generation();
        trace!("acquire for command {} ({} args)", command, args.len());

        let slot = generation
            .slots
            .take(self.shared.config.wait_timeout)
            .map_err(PoolError::Exhausted)?;

        let conn = match slot {
            Slot::Occupied(conn) => {
                trace!("reusing connection {}", conn.id);
                conn
            }
            Slot::Empty => match self.shared.factory.establish() {
                Ok(raw) => {
                    let conn = Arc::new(LiveConnection {
                        id: ConnectionId::new(),
                        conn: Mutex::new(raw),
                    });
                    let mut live = generation.live.lock();
                    live.push(Arc::clone(&conn));
                    debug!(
                        "established connection {} ({} live this generation)",
                        conn.id,
                        live.len()
                    );
                    conn
                }
                Err(e) => {
                    // Hand the capacity unit back so a failed establish
                    // does not shrink the pool.
                    let _ = generation.slots.offer(Slot::Empty);
                    return Err(e.into());
                }
            },
        };

        Ok(ConnectionHandle {
            conn: Some(conn),
            pool: Arc::downgrade(&self.shared),
        })
    }

    /// Release a connection back to the pool.
    ///
    /// Equivalent to dropping the handle. Never fails observably: a
    /// connection that cannot be re-queued (possible only across a
    /// recreation race or caller misuse) is torn down instead of reused.
    pub fn release(&self, handle: ConnectionHandle<F>) {
        drop(handle);
    }

    /// Tear down every connection the current generation has established.
    ///
    /// Best effort: individual teardown failures are logged and do not
    /// abort the teardown of the remaining connections. The slot queue and
    /// the registry are left as they are; only a full recreation resets
    /// them.
    pub fn disconnect(&self) {
        let generation = self.shared.generation.read().clone();
        info!(
            "disconnecting {} pooled connection(s)",
            generation.live.lock().len()
        );
        generation.teardown_all();
    }

    /// Number of slots currently resting in the queue.
    pub fn available_count(&self) -> usize {
        self.shared.generation.read().slots.len()
    }

    /// Number of connections established by the current generation.
    pub fn established_count(&self) -> usize {
        self.shared.generation.read().live.lock().len()
    }
}

/// A connection checked out of a [`BlockingPool`].
///
/// The handle returns its connection to the pool when dropped. If the pool
/// itself is gone by then, the connection is torn down instead.
pub struct ConnectionHandle<F: ConnectFactory> {
    conn: Option<SharedConn<F::Conn>>,
    pool: Weak<PoolShared<F>>,
}

impl<F: ConnectFactory> ConnectionHandle<F> {
    /// Identifier of the underlying connection.
    pub fn id(&self) -> ConnectionId {
        self.shared().id
    }

    /// Lock and access the underlying connection.
    pub fn get(&self) -> MutexGuard<'_, F::Conn> {
        self.shared().conn.lock()
    }

    /// Return the connection to the pool without waiting for drop.
    pub fn release(mut self) {
        self.give_back();
    }

    fn shared(&self) -> &LiveConnection<F::Conn> {
        self.conn.as_ref().expect("connection missing")
    }

    fn give_back(&mut self) {
        if let Some(conn) = self.conn.take() {
            match self.pool.upgrade() {
                Some(pool) => pool.release_conn(conn),
                None => {
                    // Pool no longer exists, close the resource.
                    if let Err(e) = conn.conn.lock().teardown() {
                        debug!("teardown of connection {} failed: {}", conn.id, e);
                    }
                }
            }
        }
    }
}

impl<F: ConnectFactory> Drop for ConnectionHandle<F> {
    fn drop(&mut self) {
        self.give_back();
    }
}

impl<F: ConnectFactory> fmt::Debug for ConnectionHandle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.conn {
            Some(conn) => write!(f, "ConnectionHandle({})", conn.id),
            None => write!(f, "ConnectionHandle(released)"),
        }
    }
}
