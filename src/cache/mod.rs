use anyhow::Result;
use redis::AsyncCommands;
use rspotify::Token;
use tracing::{debug, warn};

const TOKEN_TTL_SECS: u64 = 3600 * 24;

/// Redis-backed OAuth token store. Every call degrades to a no-op when Redis is unreachable.
pub struct TokenCache {
    client: redis::Client,
    key: String,
}

pub fn token_key(profile: &str) -> String {
    format!("moodlist:spotify_token:{profile}")
}

impl TokenCache {
    pub fn new(redis_url: &str, profile: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(TokenCache { client, key: token_key(profile) })
    }

    pub async fn load(&self) -> Option<Token> {
        let mut conn = self.client.get_multiplexed_async_connection().await.ok()?;
        let raw: Option<String> = conn.get(&self.key).await.unwrap_or(None);
        match serde_json::from_str(&raw?) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring unreadable cached token: {e}");
                None
            }
        }
    }

    pub async fn store(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_string(token)?;
        if let Ok(mut conn) = self.client.get_multiplexed_async_connection().await {
            let _: std::result::Result<(), _> = conn.set_ex(&self.key, json, TOKEN_TTL_SECS).await;
            debug!("Token cached under {}", self.key);
        }
        Ok(())
    }

    pub async fn clear(&self) {
        if let Ok(mut conn) = self.client.get_multiplexed_async_connection().await {
            let _: std::result::Result<(), _> = conn.del(&self.key).await;
        }
    }

    pub async fn ping(&self) -> bool {
        match self.client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: std::result::Result<String, _> =
                    redis::cmd("PING").query_async(&mut conn).await;
                result.is_ok()
            }
            Err(_) => false,
        }
    }
}
