//! Redis binding for the backend protocol.
//!
//! A thin mapping of the [`Backend`] trait onto a live Redis connection.
//! Nothing is retried here; a failed round-trip surfaces as
//! [`BackendError::Unavailable`] and server-side WRONGTYPE replies as
//! [`BackendError::WrongType`].

use crate::{Backend, BackendError, Result};
use ::redis::{Client, Commands, Connection, RedisError};
use parking_lot::Mutex;

/// [`Backend`] implementation over a Redis connection.
///
/// The connection is shared behind a mutex; every trait call is one
/// synchronous round-trip. Atomicity of `incr`/`rpush` comes from the
/// server itself.
pub struct RedisBackend {
    conn: Mutex<Connection>,
}

impl RedisBackend {
    /// Connect to a Redis server, e.g. `redis://127.0.0.1/`.
    pub fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(map_err)?;
        let conn = client.get_connection().map_err(map_err)?;
        tracing::debug!(url, "connected to redis backend");
        Ok(RedisBackend {
            conn: Mutex::new(conn),
        })
    }
}

impl Backend for RedisBackend {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.conn
            .lock()
            .set::<_, _, ()>(key, value)
            .map_err(map_err)
    }

    fn set_ex(&self, key: &str, ttl_seconds: u64, value: &[u8]) -> Result<()> {
        self.conn
            .lock()
            .set_ex::<_, _, ()>(key, value, ttl_seconds)
            .map_err(map_err)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.conn
            .lock()
            .get::<_, Option<Vec<u8>>>(key)
            .map_err(map_err)
    }

    fn incr(&self, key: &str) -> Result<i64> {
        self.conn.lock().incr::<_, _, i64>(key, 1).map_err(map_err)
    }

    fn rpush(&self, key: &str, value: &[u8]) -> Result<u64> {
        self.conn
            .lock()
            .rpush::<_, _, u64>(key, value)
            .map_err(map_err)
    }

    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.conn
            .lock()
            .lrange::<_, Vec<Vec<u8>>>(key, start as isize, stop as isize)
            .map_err(map_err)
    }

    fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.lock();
        ::redis::cmd("FLUSHDB")
            .query::<()>(&mut *conn)
            .map_err(map_err)
    }
}

fn map_err(e: RedisError) -> BackendError {
    if e.code() == Some("WRONGTYPE") {
        BackendError::WrongType(e.to_string())
    } else {
        BackendError::Unavailable(e.to_string())
    }
}
