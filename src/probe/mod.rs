// src/probe/mod.rs
mod custom;
mod memcached;
mod redis;
mod registry;
mod unsupported;
mod web;

pub use custom::CustomProbe;
pub use memcached::MemcachedProbe;
pub use self::redis::RedisProbe;
pub use registry::ProbeRegistry;
pub use unsupported::UnsupportedProbe;
pub use web::WebProbe;

use crate::config::{IntegrationConfig, CUSTOM, MEMCACHED, REDIS, WEB};
use crate::health::Integration;
use async_trait::async_trait;
use std::time::Duration;

pub const REDIS_KIND: &str = "Redis DB";
pub const MEMCACHED_KIND: &str = "Memcached DB";
pub const WEB_KIND: &str = "Web service API";
pub const CUSTOM_KIND: &str = "Customized test function";
pub const UNSUPPORTED_KIND: &str = "Unsupported integration";

/// A single check against one configured integration.
///
/// `run` never fails: every error is folded into the returned `Integration`.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn run(&self, config: &IntegrationConfig) -> Integration;

    /// Human-readable label reported as `kind`.
    fn kind(&self) -> &'static str;
}

/// Probe variant selected by an integration's `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Redis,
    Memcached,
    Web,
    Custom,
    Unsupported(String),
}

impl From<&str> for ProbeKind {
    fn from(tag: &str) -> Self {
        match tag {
            REDIS => ProbeKind::Redis,
            MEMCACHED => ProbeKind::Memcached,
            WEB => ProbeKind::Web,
            CUSTOM => ProbeKind::Custom,
            other => ProbeKind::Unsupported(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("response: {reply} error message: unexpected reply")]
    UnexpectedReply { reply: String },

    #[error("Expected request status code 200 got {0}")]
    HttpStatus(u16),

    /// Custom check failures are reported verbatim.
    #[error("{0}")]
    Custom(String),

    #[error("custom integration has no handle")]
    MissingHandle,

    #[error("probe panicked: {0}")]
    Panicked(String),

    #[error("unsupported type of: {0}")]
    Unsupported(String),
}
