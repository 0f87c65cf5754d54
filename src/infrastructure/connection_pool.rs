//! Connection Pool
//!
//! Bounded, TTL- and idle-aware cache of reusable connections to one
//! destination. Never blocks the caller: a cache miss dials, an overflow
//! drops. Expiry is checked inline on access; the pool owns no timer or
//! background task of its own.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Pool policy for one destination.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum number of cached (idle) connections
    pub max_capacity: usize,
    /// Maximum total connection lifetime
    pub time_to_live: Duration,
    /// Maximum time a cached connection may sit unused
    pub max_idle_time: Duration,
    /// Dial timeout
    pub connect_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_capacity: 10,
            time_to_live: Duration::from_secs(600),
            max_idle_time: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// A pooled connection.
///
/// Tracks when it was created and last returned to the pool. Once closed
/// it is never handed out or recached.
pub struct PooledConnection {
    stream: TcpStream,
    /// When this connection was dialed
    created_at: Instant,
    /// When this connection was last returned to the pool
    last_released_at: Instant,
    closed: bool,
}

impl PooledConnection {
    fn new(stream: TcpStream) -> Self {
        let now = Instant::now();
        Self {
            stream,
            created_at: now,
            last_released_at: now,
            closed: false,
        }
    }

    /// Check if this connection has exceeded its lifetime.
    pub fn is_expired(&self, time_to_live: Duration) -> bool {
        self.created_at.elapsed() > time_to_live
    }

    /// Check if this connection has sat unused too long.
    pub fn is_idle_expired(&self, max_idle_time: Duration) -> bool {
        self.last_released_at.elapsed() > max_idle_time
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Time since this connection was dialed.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    fn mark_released(&mut self) {
        self.last_released_at = Instant::now();
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.stream.shutdown().await;
        }
    }
}

/// Pool errors. Returned to the immediate caller, never escalated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoolError {
    /// Operation attempted after `close()`
    #[error("connection pool is closed")]
    Closed,
    /// Underlying connect attempt failed
    #[error("connection error: {0}")]
    ConnectError(String),
    /// Connect attempt timed out
    #[error("connection timeout")]
    ConnectTimeout,
}

/// Bounded connection cache for one destination address.
///
/// `get` and `put` complete in bounded time independent of other callers'
/// activity: capacity bounds the cache, not concurrent outstanding
/// connections, so an empty cache under load transiently over-creates
/// rather than queueing callers.
pub struct Pool {
    addr: String,
    options: PoolOptions,
    /// Available connections, capped at `max_capacity`
    idle: Mutex<VecDeque<PooledConnection>>,
    /// Read by `get`/`put`, written once by `close`
    closed: RwLock<bool>,
}

impl Pool {
    /// Create a pool for one destination address.
    pub fn new(addr: impl Into<String>, options: PoolOptions) -> Self {
        Self {
            addr: addr.into(),
            options,
            idle: Mutex::new(VecDeque::new()),
            closed: RwLock::new(false),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Number of connections currently cached.
    pub fn idle_len(&self) -> usize {
        self.idle.lock().len()
    }

    /// Pop a cached connection, or dial a fresh one on a miss. Never
    /// waits on other callers.
    ///
    /// A popped connection whose idle time has run out is closed and
    /// replaced by a fresh dial.
    pub async fn get(&self) -> Result<PooledConnection, PoolError> {
        let cached = {
            let closed = self.closed.read();
            if *closed {
                return Err(PoolError::Closed);
            }
            self.idle.lock().pop_front()
        };

        if let Some(mut conn) = cached {
            if !conn.is_closed() && !conn.is_idle_expired(self.options.max_idle_time) {
                return Ok(conn);
            }
            tracing::debug!("discarding idle connection to {}", self.addr);
            conn.close().await;
        }

        self.dial().await
    }

    /// Return a connection to the cache.
    ///
    /// A closed pool, a connection past its time-to-live, or a full queue
    /// all close the connection instead; the caller is never blocked and
    /// never sees an error.
    pub async fn put(&self, mut conn: PooledConnection) {
        {
            let closed = self.closed.read();
            if !*closed && !conn.is_closed() && !conn.is_expired(self.options.time_to_live) {
                conn.mark_released();
                let mut idle = self.idle.lock();
                if idle.len() < self.options.max_capacity {
                    idle.push_back(conn);
                    return;
                }
                tracing::debug!("pool for {} at capacity, dropping connection", self.addr);
            }
        }
        conn.close().await;
    }

    /// Close the pool. Idempotent.
    ///
    /// Everything cached is closed now; checked-out connections are
    /// closed when they are next `put`.
    pub async fn close(&self) {
        let drained: Vec<PooledConnection> = {
            let mut closed = self.closed.write();
            if *closed {
                return;
            }
            *closed = true;
            self.idle.lock().drain(..).collect()
        };
        for mut conn in drained {
            conn.close().await;
        }
    }

    async fn dial(&self) -> Result<PooledConnection, PoolError> {
        let stream = match tokio::time::timeout(
            self.options.connect_timeout,
            TcpStream::connect(&self.addr),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(PoolError::ConnectError(e.to_string())),
            Err(_) => return Err(PoolError::ConnectTimeout),
        };
        Ok(PooledConnection::new(stream))
    }
}

/// One pool per destination, constructed on demand.
pub struct PoolSet {
    options: PoolOptions,
    pools: DashMap<String, Arc<Pool>>,
}

impl PoolSet {
    pub fn new(options: PoolOptions) -> Self {
        Self {
            options,
            pools: DashMap::new(),
        }
    }

    /// Get or create the pool for a destination address.
    pub fn pool(&self, addr: &str) -> Arc<Pool> {
        self.pools
            .entry(addr.to_string())
            .or_insert_with(|| Arc::new(Pool::new(addr, self.options.clone())))
            .clone()
    }

    /// Close every pool. Handles given out earlier observe the close too.
    pub async fn close_all(&self) {
        let pools: Vec<Arc<Pool>> = self.pools.iter().map(|e| e.value().clone()).collect();
        for pool in pools {
            pool.close().await;
        }
        self.pools.clear();
    }
}

impl Default for PoolSet {
    fn default() -> Self {
        Self::new(PoolOptions::default())
    }
}
