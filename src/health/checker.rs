// src/health/checker.rs
use crate::config::{ApplicationConfig, IntegrationConfig};
use crate::health::report::{overall_status, Integration, Report, SimpleStatus};
use crate::metrics::MetricsCollector;
use crate::probe::{ProbeError, ProbeKind, ProbeRegistry};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Fans one probe out per integration and folds the results into a `Report`.
#[derive(Clone)]
pub struct HealthChecker {
    registry: ProbeRegistry,
    metrics: Option<Arc<MetricsCollector>>,
}

impl HealthChecker {
    pub fn new(registry: ProbeRegistry, metrics: Option<Arc<MetricsCollector>>) -> Self {
        Self { registry, metrics }
    }

    pub fn simple_check(&self) -> SimpleStatus {
        SimpleStatus::default()
    }

    /// Probe every integration concurrently and wait for all of them.
    ///
    /// Entries in `Report::integrations` appear in completion order. Each
    /// configured integration yields exactly one entry, even if its probe
    /// task panics.
    pub async fn detailed_check(&self, config: &ApplicationConfig) -> Report {
        let date = Utc::now();
        let start = Instant::now();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut tasks = Vec::with_capacity(config.integrations.len());
        for integration in &config.integrations {
            let kind = ProbeKind::from(integration.kind.as_str());
            let probe = self.registry.resolve(&kind);
            let label = probe.kind();
            let owned = integration.clone();
            let tx = tx.clone();

            debug!(
                "Dispatching {} probe for {:?} ({})",
                label,
                integration.name,
                integration.address()
            );

            let handle = tokio::spawn(async move {
                let result = probe.run(&owned).await;
                let _ = tx.send(result);
            });
            tasks.push(Dispatched {
                config: integration.clone(),
                label,
                handle,
            });
        }

        // The supervisor owns the last sender, so the channel closes once
        // every probe has reported.
        let supervisor = tokio::spawn(supervise(tasks, tx, start));

        let mut integrations = Vec::with_capacity(config.integrations.len());
        while let Some(result) = rx.recv().await {
            if result.status {
                debug!("Integration {:?} is healthy", result.name);
            } else {
                warn!("Integration {:?} is unhealthy: {:?}", result.name, result.error);
            }
            if let Some(metrics) = &self.metrics {
                metrics.record_probe(&result);
            }
            integrations.push(result);
        }

        let duration = supervisor.await.unwrap_or_else(|e| {
            error!("Health check supervisor failed: {}", e);
            start.elapsed()
        });

        let report = Report {
            name: config.name.clone(),
            status: overall_status(&integrations),
            version: config.version.clone(),
            date,
            duration: duration.as_secs_f64(),
            integrations,
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_report(&report);
        }

        info!(
            "Health check complete: {} integrations, status {}, {:.3}s",
            report.integrations.len(),
            report.status,
            report.duration
        );

        report
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new(ProbeRegistry::new(), None)
    }
}

struct Dispatched {
    config: IntegrationConfig,
    label: &'static str,
    handle: JoinHandle<()>,
}

/// Wait for every probe task. A task that died without reporting gets a
/// synthesized failure so the collector still sees one result per input.
async fn supervise(
    tasks: Vec<Dispatched>,
    tx: mpsc::UnboundedSender<Integration>,
    start: Instant,
) -> Duration {
    let (pending, handles): (Vec<_>, Vec<_>) = tasks
        .into_iter()
        .map(|t| ((t.config, t.label), t.handle))
        .unzip();
    let outcomes = futures::future::join_all(handles).await;

    for ((config, label), outcome) in pending.iter().zip(outcomes) {
        if let Err(e) = outcome {
            error!("Probe task for {:?} failed: {}", config.name, e);
            let _ = tx.send(Integration::from_outcome(
                config,
                label,
                config.address(),
                start.elapsed(),
                Err(ProbeError::Panicked(e.to_string())),
            ));
        }
    }

    start.elapsed()
}
