// src/probe/custom.rs
use super::{Probe, ProbeError, CUSTOM_KIND};
use crate::config::IntegrationConfig;
use crate::health::Integration;
use async_trait::async_trait;
use std::time::Instant;

/// Runs a caller-supplied check on the blocking pool.
///
/// Handles are plain synchronous closures that may sleep or do blocking I/O,
/// so they are kept off the async workers that drive the other probes.
pub struct CustomProbe;

impl CustomProbe {
    pub fn new() -> Self {
        Self
    }

    async fn check(config: &IntegrationConfig) -> Result<(), ProbeError> {
        let handle = config.handle.clone().ok_or(ProbeError::MissingHandle)?;

        match tokio::task::spawn_blocking(move || handle.call()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ProbeError::Custom(e.to_string())),
            Err(e) => Err(ProbeError::Panicked(e.to_string())),
        }
    }
}

#[async_trait]
impl Probe for CustomProbe {
    async fn run(&self, config: &IntegrationConfig) -> Integration {
        let url = config.address();

        let start = Instant::now();
        let outcome = Self::check(config).await;
        let elapsed = start.elapsed();

        Integration::from_outcome(config, self.kind(), url, elapsed, outcome)
    }

    fn kind(&self) -> &'static str {
        CUSTOM_KIND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CUSTOM;
    use std::time::Duration;

    #[tokio::test]
    async fn ok_handle_is_healthy() {
        let config = IntegrationConfig::new(CUSTOM, "always ok", "none").with_handle(|| Ok(()));
        let result = CustomProbe::new().run(&config).await;

        assert!(result.status);
        assert!(result.error.is_none());
        assert_eq!(result.kind, CUSTOM_KIND);
        assert_eq!(result.url, "none");
    }

    #[tokio::test]
    async fn error_message_is_kept_verbatim() {
        let config = IntegrationConfig::new(CUSTOM, "always fails", "none")
            .with_handle(|| Err("error triggered by testing".into()));
        let result = CustomProbe::new().run(&config).await;

        assert!(!result.status);
        assert_eq!(result.error.as_deref(), Some("error triggered by testing"));
    }

    #[tokio::test]
    async fn panicking_handle_is_unhealthy() {
        let config = IntegrationConfig::new(CUSTOM, "panics", "none")
            .with_handle(|| panic!("handle exploded"));
        let result = CustomProbe::new().run(&config).await;

        assert!(!result.status);
        assert!(result.error.unwrap().starts_with("probe panicked"));
    }

    #[tokio::test]
    async fn missing_handle_is_unhealthy() {
        let config = IntegrationConfig::new(CUSTOM, "no handle", "none");
        let result = CustomProbe::new().run(&config).await;

        assert!(!result.status);
        assert_eq!(result.error.as_deref(), Some("custom integration has no handle"));
    }

    #[tokio::test]
    async fn response_time_covers_the_handle() {
        let config = IntegrationConfig::new(CUSTOM, "slow", "none").with_handle(|| {
            std::thread::sleep(Duration::from_millis(100));
            Ok(())
        });
        let result = CustomProbe::new().run(&config).await;

        assert!(result.status);
        assert!(result.response_time >= 0.1);
    }
}
