// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Type tags understood by the probe registry.
pub const REDIS: &str = "redis";
pub const MEMCACHED: &str = "memcached";
pub const WEB: &str = "web";
pub const CUSTOM: &str = "custom";

/// Error type a custom check may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Caller-supplied zero-argument check. `Ok(())` means healthy.
#[derive(Clone)]
pub struct CustomCheck(Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>);

impl CustomCheck {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) -> Result<(), BoxError> {
        (self.0)()
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(..)")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HttpHeader {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// One external dependency to probe.
///
/// Which optional fields matter depends on `kind`; the rest are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<String>,
    /// Seconds; zero or negative selects the probe default.
    #[serde(default)]
    pub timeout: i64,
    #[serde(default)]
    pub db: i64,
    #[serde(default)]
    pub headers: Vec<HttpHeader>,
    #[serde(default)]
    pub auth: Option<Auth>,
    #[serde(skip)]
    pub handle: Option<CustomCheck>,
}

impl IntegrationConfig {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_timeout(mut self, secs: i64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HttpHeader {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_handle<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.handle = Some(CustomCheck::new(f));
        self
    }

    /// `host`, with `:port` appended when a port is configured.
    pub fn address(&self) -> String {
        match self.port.as_deref() {
            Some(port) if !port.is_empty() => format!("{}:{}", self.host, port),
            _ => self.host.clone(),
        }
    }

    /// Configured timeout, or `default` when unset or non-positive.
    pub fn timeout_or(&self, default: Duration) -> Duration {
        if self.timeout > 0 {
            Duration::from_secs(self.timeout.unsigned_abs())
        } else {
            default
        }
    }

    /// Logical database index; non-positive values select 0.
    pub fn db_index(&self) -> i64 {
        self.db.max(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub integrations: Vec<IntegrationConfig>,
}

impl ApplicationConfig {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            integrations: Vec::new(),
        }
    }

    pub fn with_integration(mut self, integration: IntegrationConfig) -> Self {
        self.integrations.push(integration);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub application: ApplicationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.server.liveness_path.is_empty() || self.server.readiness_path.is_empty() {
            bail!("server liveness and readiness paths must not be empty");
        }
        if self.server.liveness_path == self.server.readiness_path {
            bail!(
                "liveness and readiness paths must differ (both are {})",
                self.server.liveness_path
            );
        }
        if self.metrics.enabled {
            if self.metrics.port == self.server.listen.port() {
                bail!("metrics port {} collides with the server port", self.metrics.port);
            }
            if self.metrics.path.is_empty() {
                bail!("metrics path must not be empty");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_liveness_path")]
    pub liveness_path: String,
    #[serde(default = "default_readiness_path")]
    pub readiness_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            liveness_path: default_liveness_path(),
            readiness_path: default_readiness_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8888))
}

fn default_liveness_path() -> String {
    "/health-check/liveness".to_string()
}

fn default_readiness_path() -> String {
    "/health-check/readiness".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

// Ports show up as numbers in hand-written YAML and as strings elsewhere.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    Ok(Option::<PortRepr>::deserialize(deserializer)?.map(|port| match port {
        PortRepr::Number(n) => n.to_string(),
        PortRepr::Text(s) => s,
    }))
}
