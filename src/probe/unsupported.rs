// src/probe/unsupported.rs
use super::{Probe, ProbeError, UNSUPPORTED_KIND};
use crate::config::IntegrationConfig;
use crate::health::Integration;
use async_trait::async_trait;
use std::time::Duration;

/// Reports any unrecognized `type` as a failed integration.
pub struct UnsupportedProbe;

impl UnsupportedProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Probe for UnsupportedProbe {
    async fn run(&self, config: &IntegrationConfig) -> Integration {
        Integration::from_outcome(
            config,
            self.kind(),
            config.host.clone(),
            Duration::ZERO,
            Err(ProbeError::Unsupported(config.kind.clone())),
        )
    }

    fn kind(&self) -> &'static str {
        UNSUPPORTED_KIND
    }
}
