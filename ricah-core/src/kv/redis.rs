use std::fmt;

use async_trait::async_trait;
use redis::{Script, aio::ConnectionManager};
use tracing::{debug, info};

use crate::error::{GalleryError, Result};
use crate::kv::{OrderStore, VersionedOrder};
use ricah_model::MediaId;

/// Redis-backed order store.
///
/// The id list is JSON under a fixed key with the revision counter in a
/// sibling key. Saves go through a Lua script so the revision check and both
/// writes are one atomic step.
#[derive(Clone)]
pub struct RedisOrderStore {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisOrderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisOrderStore")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrderKeys;

impl OrderKeys {
    pub fn order() -> &'static str {
        "media_order"
    }

    pub fn revision() -> &'static str {
        "media_order:rev"
    }
}

/// Returns the new revision on success. On a revision mismatch it returns the
/// stored revision negated (<= 0) and writes nothing.
const SAVE_ORDER_SCRIPT: &str = r#"
local rev = tonumber(redis.call('GET', KEYS[2]) or '0')
if ARGV[2] ~= '' and tonumber(ARGV[2]) ~= rev then
  return -rev
end
rev = rev + 1
redis.call('SET', KEYS[1], ARGV[1])
redis.call('SET', KEYS[2], rev)
return rev
"#;

impl RedisOrderStore {
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("Connecting to Redis order store at {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        info!("Successfully connected to Redis order store");

        Ok(Self { conn })
    }
}

#[async_trait]
impl OrderStore for RedisOrderStore {
    async fn fetch(&self) -> Result<Option<VersionedOrder>> {
        debug!("Order GET: {}", OrderKeys::order());

        let mut conn = self.conn.clone();
        let (raw, revision): (Option<String>, Option<u64>) = redis::pipe()
            .get(OrderKeys::order())
            .get(OrderKeys::revision())
            .query_async(&mut conn)
            .await?;

        match raw {
            Some(json) => {
                let ids: Vec<MediaId> = serde_json::from_str(&json)?;
                Ok(Some(VersionedOrder {
                    ids,
                    revision: revision.unwrap_or(0),
                }))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        ids: &[MediaId],
        expected: Option<u64>,
    ) -> Result<u64> {
        debug!(
            len = ids.len(),
            expected = ?expected,
            "Order SET: {}",
            OrderKeys::order()
        );

        let json = serde_json::to_string(ids)?;
        let expected_arg =
            expected.map(|rev| rev.to_string()).unwrap_or_default();

        let mut conn = self.conn.clone();
        let outcome: i64 = Script::new(SAVE_ORDER_SCRIPT)
            .key(OrderKeys::order())
            .key(OrderKeys::revision())
            .arg(json)
            .arg(expected_arg)
            .invoke_async(&mut conn)
            .await?;

        if outcome <= 0 {
            return Err(GalleryError::RevisionConflict {
                expected: expected.unwrap_or(0),
                actual: (-outcome) as u64,
            });
        }

        Ok(outcome as u64)
    }
}
