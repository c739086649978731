// src/probe/web.rs
use super::{Probe, ProbeError, WEB_KIND};
use crate::config::IntegrationConfig;
use crate::health::Integration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// GETs the configured URL; only an exact 200 counts as healthy.
pub struct WebProbe {
    client: Client,
}

impl WebProbe {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Probe for WebProbe {
    async fn run(&self, config: &IntegrationConfig) -> Integration {
        let url = config.address();
        let timeout = config.timeout_or(DEFAULT_TIMEOUT);

        let mut request = self.client.get(url.as_str()).timeout(timeout);
        for header in &config.headers {
            request = request.header(header.key.as_str(), header.value.as_str());
        }

        let start = Instant::now();
        let outcome = match request.send().await {
            Ok(response) if response.status() == StatusCode::OK => Ok(()),
            Ok(response) => Err(ProbeError::HttpStatus(response.status().as_u16())),
            Err(e) if e.is_timeout() => Err(ProbeError::Timeout(timeout)),
            Err(e) => Err(ProbeError::Connection(e.to_string())),
        };
        let elapsed = start.elapsed();

        Integration::from_outcome(config, self.kind(), url, elapsed, outcome)
    }

    fn kind(&self) -> &'static str {
        WEB_KIND
    }
}
