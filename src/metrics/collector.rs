// src/metrics/collector.rs
use crate::health::{Integration, Report};
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Probe metrics
    pub probes_total: IntCounterVec,
    pub probe_duration_seconds: HistogramVec,
    pub integration_status: IntGaugeVec,

    // Report metrics
    pub reports_total: IntCounterVec,
    pub report_duration_seconds: Histogram,
    pub overall_status: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let probes_total = IntCounterVec::new(
            Opts::new("health_probes_total", "Total number of probes run"),
            &["kind", "status"],
        )?;
        registry.register(Box::new(probes_total.clone()))?;

        let probe_duration_seconds = HistogramVec::new(
            HistogramOpts::new("health_probe_duration_seconds", "Probe duration in seconds"),
            &["kind"],
        )?;
        registry.register(Box::new(probe_duration_seconds.clone()))?;

        let integration_status = IntGaugeVec::new(
            Opts::new(
                "health_integration_status",
                "Last probe outcome per integration (1=healthy, 0=unhealthy)",
            ),
            &["integration", "kind", "url"],
        )?;
        registry.register(Box::new(integration_status.clone()))?;

        let reports_total = IntCounterVec::new(
            Opts::new("health_reports_total", "Total number of detailed checks"),
            &["status"],
        )?;
        registry.register(Box::new(reports_total.clone()))?;

        let report_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "health_report_duration_seconds",
            "Detailed check duration in seconds",
        ))?;
        registry.register(Box::new(report_duration_seconds.clone()))?;

        let overall_status = IntGauge::new(
            "health_overall_status",
            "Outcome of the last detailed check (1=healthy, 0=unhealthy)",
        )?;
        registry.register(Box::new(overall_status.clone()))?;

        Ok(Self {
            probes_total,
            probe_duration_seconds,
            integration_status,
            reports_total,
            report_duration_seconds,
            overall_status,
        })
    }

    pub fn record_probe(&self, result: &Integration) {
        let status = if result.status { "healthy" } else { "unhealthy" };
        self.probes_total
            .with_label_values(&[&result.kind, status])
            .inc();

        self.probe_duration_seconds
            .with_label_values(&[&result.kind])
            .observe(result.response_time);

        self.integration_status
            .with_label_values(&[&result.name, &result.kind, &result.url])
            .set(i64::from(result.status));
    }

    pub fn record_report(&self, report: &Report) {
        let status = if report.status { "healthy" } else { "unhealthy" };
        self.reports_total.with_label_values(&[status]).inc();
        self.report_duration_seconds.observe(report.duration);
        self.overall_status.set(i64::from(report.status));
    }
}
