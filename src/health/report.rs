// src/health/report.rs
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;

use crate::config::IntegrationConfig;
use crate::probe::ProbeError;

/// Outcome of a single probe. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Integration {
    pub name: String,
    pub kind: String,
    pub status: bool,
    /// Seconds.
    pub response_time: f64,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Integration {
    pub fn from_outcome(
        config: &IntegrationConfig,
        kind: &str,
        url: String,
        elapsed: Duration,
        outcome: Result<(), ProbeError>,
    ) -> Self {
        let (status, error) = match outcome {
            Ok(()) => (true, None),
            Err(e) => (false, Some(e.to_string())),
        };

        Self {
            name: config.name.clone(),
            kind: kind.to_string(),
            status,
            response_time: elapsed.as_secs_f64(),
            url,
            error,
        }
    }
}

/// Aggregated result of one detailed check.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    pub status: bool,
    pub version: String,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub date: DateTime<Utc>,
    /// Seconds from report start to the last probe completion.
    pub duration: f64,
    /// Completion order, not configuration order.
    pub integrations: Vec<Integration>,
}

/// Constant body for the liveness path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleStatus {
    pub status: &'static str,
}

impl SimpleStatus {
    pub const FULLY_FUNCTIONAL: &'static str = "fully functional";
}

impl Default for SimpleStatus {
    fn default() -> Self {
        Self {
            status: Self::FULLY_FUNCTIONAL,
        }
    }
}

/// True iff every probe passed. Vacuously true for no probes.
pub fn overall_status(integrations: &[Integration]) -> bool {
    integrations.iter().all(|i| i.status)
}

fn serialize_rfc3339<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn integration(status: bool) -> Integration {
        Integration {
            name: "dep".to_string(),
            kind: "Web service API".to_string(),
            status,
            response_time: 0.0,
            url: "http://localhost".to_string(),
            error: (!status).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn empty_report_is_healthy() {
        assert!(overall_status(&[]));
    }

    #[test]
    fn single_failure_marks_report_unhealthy() {
        let all = vec![integration(true), integration(false), integration(true)];
        assert!(!overall_status(&all));
    }

    proptest! {
        #[test]
        fn status_fold_ignores_completion_order(
            statuses in prop::collection::vec(any::<bool>(), 0..32),
            shift in 0usize..32,
        ) {
            let mut results: Vec<Integration> = statuses.iter().copied().map(integration).collect();
            let expected = statuses.iter().all(|s| *s);
            prop_assert_eq!(overall_status(&results), expected);

            if !results.is_empty() {
                let len = results.len();
                results.rotate_left(shift % len);
                prop_assert_eq!(overall_status(&results), expected);
                results.reverse();
                prop_assert_eq!(overall_status(&results), expected);
            }
        }
    }

    #[test]
    fn report_serializes_expected_shape() {
        let report = Report {
            name: "app".to_string(),
            status: false,
            version: "1.0.0".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            duration: 0.25,
            integrations: vec![integration(true), integration(false)],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["date"], "2024-05-01T12:30:00Z");
        assert_eq!(json["status"], false);
        assert!(json["integrations"][0].get("error").is_none());
        assert_eq!(json["integrations"][1]["error"], "boom");
        assert_eq!(json["integrations"][1]["response_time"], 0.0);
    }

    #[test]
    fn simple_status_is_constant() {
        let json = serde_json::to_string(&SimpleStatus::default()).unwrap();
        assert_eq!(json, r#"{"status":"fully functional"}"#);
    }
}
