// src/probe/redis.rs
use super::{Probe, ProbeError, REDIS_KIND};
use crate::config::IntegrationConfig;
use crate::health::Integration;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a short-lived connection, selects `db` and expects `PONG` to `PING`.
pub struct RedisProbe;

impl RedisProbe {
    pub fn new() -> Self {
        Self
    }

    /// `redis://[user:pass@]host[:port]/db`
    fn connection_url(config: &IntegrationConfig) -> Result<Url, ProbeError> {
        let address = config.address();
        let invalid = |reason: String| ProbeError::InvalidAddress {
            address: address.clone(),
            reason,
        };

        let raw = if address.starts_with("redis://") || address.starts_with("rediss://") {
            address.clone()
        } else {
            format!("redis://{}", address)
        };
        let mut url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;

        url.set_path(&config.db_index().to_string());

        if let Some(auth) = &config.auth {
            if !auth.username.is_empty() {
                url.set_username(&auth.username)
                    .map_err(|_| invalid("cannot carry a username".to_string()))?;
            }
            if !auth.password.is_empty() {
                url.set_password(Some(&auth.password))
                    .map_err(|_| invalid("cannot carry a password".to_string()))?;
            }
        }

        Ok(url)
    }

    async fn ping(url: Url) -> Result<(), ProbeError> {
        let client = ::redis::Client::open(url.as_str())
            .map_err(|e| ProbeError::Connection(e.to_string()))?;
        // Dropped on every return path below, closing the socket.
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        let reply: String = ::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        if reply == "PONG" {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedReply { reply })
        }
    }
}

#[async_trait]
impl Probe for RedisProbe {
    async fn run(&self, config: &IntegrationConfig) -> Integration {
        let address = config.address();
        let limit = config.timeout_or(DEFAULT_TIMEOUT);

        let url = match Self::connection_url(config) {
            Ok(url) => url,
            Err(e) => {
                return Integration::from_outcome(config, self.kind(), address, Duration::ZERO, Err(e))
            }
        };

        let start = Instant::now();
        let outcome = match timeout(limit, Self::ping(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(limit)),
        };
        let elapsed = start.elapsed();

        Integration::from_outcome(config, self.kind(), address, elapsed, outcome)
    }

    fn kind(&self) -> &'static str {
        REDIS_KIND
    }
}
