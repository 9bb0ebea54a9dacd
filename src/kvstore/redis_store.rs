use std::fmt;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, IntoConnectionInfo};
use tracing::{debug, info};

use super::KeyValueStore;
use super::error::KvStoreError;

/// Redis-backed store bound to a single logical database index.
#[derive(Clone)]
pub struct RedisKvStore {
    connection: ConnectionManager,
    url: String,
    db: i64,
}

impl fmt::Debug for RedisKvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKvStore")
            .field("url", &sanitize_url(&self.url))
            .field("db", &self.db)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisKvStore {
    /// Connects to `url`, selecting database `db` regardless of any db in the URL.
    pub async fn connect(url: &str, db: i64) -> Result<Self, KvStoreError> {
        let connection_failed = |message: String| KvStoreError::ConnectionFailed {
            url: sanitize_url(url),
            db,
            message,
        };

        let mut info = url
            .into_connection_info()
            .map_err(|e| connection_failed(e.to_string()))?;
        info.redis.db = db;

        let client = Client::open(info).map_err(|e| connection_failed(e.to_string()))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| connection_failed(e.to_string()))?;

        info!(url = %sanitize_url(url), db, "Connected to Redis");
        Ok(Self {
            connection,
            url: url.to_string(),
            db,
        })
    }

    pub fn db(&self) -> i64 {
        self.db
    }

    /// Sends `PING`.
    pub async fn ping(&self) -> Result<(), KvStoreError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| KvStoreError::CommandFailed {
                operation: "ping",
                message: e.to_string(),
            })?;
        Ok(())
    }
}

impl KeyValueStore for RedisKvStore {
    async fn is_ready(&self) -> bool {
        self.ping().await.is_ok()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        let mut conn = self.connection.clone();
        let value: Option<String> =
            conn.get(key)
                .await
                .map_err(|e| KvStoreError::CommandFailed {
                    operation: "get",
                    message: e.to_string(),
                })?;
        debug!(db = self.db, hit = value.is_some(), "Redis GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| KvStoreError::CommandFailed {
                operation: "set",
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// Strips credentials from a Redis URL for logging.
pub(crate) fn sanitize_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
