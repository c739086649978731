// src/probe/memcached.rs
use super::{Probe, ProbeError, MEMCACHED_KIND};
use crate::config::IntegrationConfig;
use crate::health::Integration;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Pings a memcached server with the text-protocol `version` command.
pub struct MemcachedProbe;

impl MemcachedProbe {
    pub fn new() -> Self {
        Self
    }

    async fn ping(address: &str) -> Result<(), ProbeError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;
        let mut stream = BufReader::new(stream);

        stream
            .get_mut()
            .write_all(b"version\r\n")
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        let mut line = String::new();
        stream
            .read_line(&mut line)
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        if line.starts_with("VERSION ") {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedReply {
                reply: line.trim_end().to_string(),
            })
        }
    }
}

#[async_trait]
impl Probe for MemcachedProbe {
    async fn run(&self, config: &IntegrationConfig) -> Integration {
        let address = config.address();
        let limit = config.timeout_or(DEFAULT_TIMEOUT);

        let start = Instant::now();
        let outcome = match timeout(limit, Self::ping(&address)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(limit)),
        };
        let elapsed = start.elapsed();

        Integration::from_outcome(config, self.kind(), address, elapsed, outcome)
    }

    fn kind(&self) -> &'static str {
        MEMCACHED_KIND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MEMCACHED;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn fake_server(reply: &'static [u8]) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(reply).await;
        });
        addr
    }

    #[tokio::test]
    async fn version_reply_is_healthy() {
        let addr = fake_server(b"VERSION 1.6.21\r\n").await;
        let config = IntegrationConfig::new(MEMCACHED, "sessions", addr.ip().to_string())
            .with_port(addr.port().to_string());

        let result = MemcachedProbe::new().run(&config).await;

        assert!(result.status, "unexpected error: {:?}", result.error);
        assert_eq!(result.url, addr.to_string());
        assert_eq!(result.kind, MEMCACHED_KIND);
    }

    #[tokio::test]
    async fn error_reply_is_unhealthy() {
        let addr = fake_server(b"ERROR\r\n").await;
        let config = IntegrationConfig::new(MEMCACHED, "sessions", addr.to_string());

        let result = MemcachedProbe::new().run(&config).await;

        assert!(!result.status);
        assert!(result.error.unwrap().contains("ERROR"));
    }

    #[tokio::test]
    async fn closed_port_is_unhealthy() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = IntegrationConfig::new(MEMCACHED, "sessions", addr.to_string());
        let result = MemcachedProbe::new().run(&config).await;

        assert!(!result.status);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let config = IntegrationConfig::new(MEMCACHED, "sessions", addr.to_string());
        let result = MemcachedProbe::new().run(&config).await;

        assert!(!result.status);
        assert!(result.error.unwrap().starts_with("timed out"));
    }
}
