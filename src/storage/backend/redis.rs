use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::{debug, error, trace};

use crate::errors::{Result, TinylinkError};
use crate::storage::models::fields;
use crate::storage::{UrlRecord, UrlStore};

/// KEYS[1] = record key, ARGV[1] = expiration, ARGV[2..] = field/value pairs.
/// Returns 0 if the key already exists, 1 once written.
///
/// The expiration is checked before any write, and the hash is deleted again
/// if `EXPIREAT` fails, so a record never outlives its TTL.
const CREATE_SCRIPT: &str = r#"
local expiration = tonumber(ARGV[1])
if expiration == nil or expiration < 0 then
  return redis.error_reply('invalid expiration ' .. ARGV[1])
end
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
redis.call('HSET', KEYS[1], unpack(ARGV, 2))
if expiration > 0 then
  local ok = redis.pcall('EXPIREAT', KEYS[1], ARGV[1])
  if type(ok) == 'table' and ok.err then
    redis.call('DEL', KEYS[1])
    return redis.error_reply(ok.err)
  end
end
return 1
"#;

/// KEYS[1] = record key, ARGV[1] = counter field.
/// Returns -1 if the key is gone, otherwise the new counter value.
const INCREMENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return -1
end
return redis.call('HINCRBY', KEYS[1], ARGV[1], 1)
"#;

/// Redis-backed URL table.
///
/// Each record is a hash at `{key_prefix}{shortCode}`. Records with a non-zero
/// expiration get `EXPIREAT`, so Redis itself deletes them.
pub struct RedisStore {
    client: redis::Client,
    /// 首次使用时建立，之后复用
    connection: OnceCell<ConnectionManager>,
    key_prefix: String,
    create_script: redis::Script,
    increment_script: redis::Script,
}

impl RedisStore {
    /// Parse the connection URL. No connection is made until the first operation.
    pub fn new(url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            TinylinkError::store_connection(format!("Invalid Redis URL '{}': {}", url, e))
        })?;

        debug!("RedisStore created with prefix: '{}'", key_prefix);

        Ok(Self {
            client,
            connection: OnceCell::new(),
            key_prefix: key_prefix.to_string(),
            create_script: redis::Script::new(CREATE_SCRIPT),
            increment_script: redis::Script::new(INCREMENT_SCRIPT),
        })
    }

    async fn connection(&self) -> redis::RedisResult<ConnectionManager> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                let conn = ConnectionManager::new(self.client.clone()).await?;
                debug!("Redis connection established");
                Ok::<_, redis::RedisError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }

    fn make_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

/// `ARGV` for [`CREATE_SCRIPT`]: the expiration, then the hash field/value pairs.
pub(crate) fn create_args(record: &UrlRecord) -> Vec<String> {
    let mut args = vec![record.expiration.to_string()];
    for (field, value) in to_hash_fields(record) {
        args.push(field.to_string());
        args.push(value);
    }
    args
}

/// Field/value pairs written for a record.
pub(crate) fn to_hash_fields(record: &UrlRecord) -> Vec<(&'static str, String)> {
    vec![
        (fields::SHORT_CODE, record.short_code.clone()),
        (fields::ORIGINAL_URL, record.original_url.clone()),
        (fields::CREATED_AT, record.created_at.clone()),
        (fields::EXPIRATION, record.expiration.to_string()),
        (fields::CLICK_COUNT, record.click_count.to_string()),
    ]
}

/// Rebuild a record from an `HGETALL` reply.
pub(crate) fn from_hash_fields(code: &str, mut map: HashMap<String, String>) -> Result<UrlRecord> {
    let mut take = |field: &str| {
        map.remove(field).ok_or_else(|| {
            TinylinkError::store_read(format!(
                "Record '{}' is missing attribute '{}'",
                code, field
            ))
        })
    };

    let short_code = take(fields::SHORT_CODE)?;
    let original_url = take(fields::ORIGINAL_URL)?;
    let created_at = take(fields::CREATED_AT)?;
    let expiration = take(fields::EXPIRATION)?;
    let click_count = take(fields::CLICK_COUNT)?;

    Ok(UrlRecord {
        short_code,
        original_url,
        created_at,
        expiration: expiration.parse().map_err(|e| {
            TinylinkError::store_read(format!("Record '{}' has bad expiration: {}", code, e))
        })?,
        click_count: click_count.parse().map_err(|e| {
            TinylinkError::store_read(format!("Record '{}' has bad clickCount: {}", code, e))
        })?,
    })
}

#[async_trait]
impl UrlStore for RedisStore {
    async fn create(&self, record: &UrlRecord) -> Result<()> {
        let key = self.make_key(&record.short_code);
        let mut conn = self.connection().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            TinylinkError::store_write(format!("Redis connection failed: {}", e))
        })?;

        let mut invocation = self.create_script.key(&key);
        for arg in create_args(record) {
            invocation.arg(arg);
        }

        let created: i64 = invocation.invoke_async(&mut conn).await.map_err(|e| {
            error!("Failed to create '{}' in Redis: {}", record.short_code, e);
            TinylinkError::store_write(format!("Failed to create short URL: {}", e))
        })?;

        if created == 0 {
            return Err(TinylinkError::code_conflict(format!(
                "Short code '{}' already exists",
                record.short_code
            )));
        }

        trace!("RedisStore: created {}", key);
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<UrlRecord> {
        let key = self.make_key(code);
        let mut conn = self.connection().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            TinylinkError::store_read(format!("Redis connection failed: {}", e))
        })?;

        let map: HashMap<String, String> = conn.hgetall(&key).await.map_err(|e| {
            error!("Failed to read '{}' from Redis: {}", code, e);
            TinylinkError::store_read(format!("Failed to retrieve URL: {}", e))
        })?;

        if map.is_empty() {
            trace!("RedisStore: key not found: {}", key);
            return Err(TinylinkError::not_found("URL not found"));
        }

        from_hash_fields(code, map)
    }

    async fn increment_clicks(&self, code: &str) -> Result<()> {
        let key = self.make_key(code);
        let mut conn = self.connection().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            TinylinkError::store_write(format!("Redis connection failed: {}", e))
        })?;

        let clicks: i64 = self
            .increment_script
            .key(&key)
            .arg(fields::CLICK_COUNT)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to increment clicks for '{}': {}", code, e);
                TinylinkError::store_write(format!("Failed to increment click count: {}", e))
            })?;

        if clicks < 0 {
            return Err(TinylinkError::not_found("URL not found"));
        }

        trace!("RedisStore: {} now has {} clicks", code, clicks);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
