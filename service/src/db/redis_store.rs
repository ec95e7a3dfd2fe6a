// service/src/db/redis_store.rs

//! # Redis
//!
//! Holds one JSON document per user under `cart:{user_id}`.
//!
//! The conditional write runs as a Lua script: Redis executes scripts
//! atomically, so comparing the stored value and writing the new one cannot
//! interleave with another writer. `WATCH`/`MULTI` is not an option here because
//! the connection manager multiplexes every request over one connection.

use async_trait::async_trait;
use cartkeep::{CartError, CartResult, DocumentStore, SwapOutcome};
use redis::{aio::ConnectionManager, AsyncCommands, Client, Script};
use std::time::Duration;
use tracing::{debug, instrument};

const SERVICE: &str = "redis";

// KEYS[1] = key
// ARGV[1] = expected value, ARGV[2] = "1" if a value is expected, "0" if the key must be absent
// ARGV[3] = new value, ARGV[4] = ttl in milliseconds, 0 to persist
const COMPARE_AND_SWAP: &str = r#"
local current = redis.call('GET', KEYS[1])
if ARGV[2] == '1' then
  if current ~= ARGV[1] then
    return 0
  end
elseif current then
  return 0
end
local ttl = tonumber(ARGV[4])
if ttl > 0 then
  redis.call('SET', KEYS[1], ARGV[3], 'PX', ttl)
else
  redis.call('SET', KEYS[1], ARGV[3])
end
return 1
"#;

pub async fn init_redis(redis_url: &str) -> CartResult<ConnectionManager> {
  let client = Client::open(redis_url).map_err(|e| CartError::upstream(SERVICE, e))?;
  client
    .get_connection_manager()
    .await
    .map_err(|e| CartError::upstream(SERVICE, e))
}

#[derive(Clone)]
pub struct RedisDocumentStore {
  conn: ConnectionManager,
  cas: Script,
}

impl std::fmt::Debug for RedisDocumentStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RedisDocumentStore").finish_non_exhaustive()
  }
}

impl RedisDocumentStore {
  pub fn new(conn: ConnectionManager) -> Self {
    Self {
      conn,
      cas: Script::new(COMPARE_AND_SWAP),
    }
  }

  pub async fn connect(redis_url: &str) -> CartResult<Self> {
    Ok(Self::new(init_redis(redis_url).await?))
  }
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
  #[instrument(name = "RedisDocumentStore::get", skip(self), err(Display))]
  async fn get(&self, key: &str) -> CartResult<Option<String>> {
    let mut conn = self.conn.clone();
    conn
      .get::<_, Option<String>>(key)
      .await
      .map_err(|e| CartError::upstream(SERVICE, e))
  }

  #[instrument(name = "RedisDocumentStore::compare_and_swap", skip(self, expected, value), err(Display))]
  async fn compare_and_swap(
    &self,
    key: &str,
    expected: Option<&str>,
    value: &str,
    ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    let mut conn = self.conn.clone();
    let ttl_ms = ttl.map(|d| d.as_millis().clamp(1, i64::MAX as u128) as i64).unwrap_or(0);

    let applied: i64 = self
      .cas
      .key(key)
      .arg(expected.unwrap_or(""))
      .arg(if expected.is_some() { "1" } else { "0" })
      .arg(value)
      .arg(ttl_ms)
      .invoke_async(&mut conn)
      .await
      .map_err(|e| CartError::upstream(SERVICE, e))?;

    if applied == 1 {
      Ok(SwapOutcome::Applied)
    } else {
      debug!(key, "Conditional write rejected");
      Ok(SwapOutcome::Conflict)
    }
  }
}
