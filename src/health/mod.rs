// src/health/mod.rs
mod checker;
mod report;

pub use checker::HealthChecker;
pub use report::{overall_status, Integration, Report, SimpleStatus};

use crate::config::ApplicationConfig;
use std::sync::LazyLock;

// Shared so repeated readiness calls reuse one HTTP connection pool.
static DEFAULT_CHECKER: LazyLock<HealthChecker> = LazyLock::new(HealthChecker::default);

/// Liveness answer; performs no probing.
pub fn simple_check() -> SimpleStatus {
    SimpleStatus::default()
}

/// Readiness answer using the built-in probes and no metrics.
///
/// Embedders that want metrics or their own probes should hold a
/// `HealthChecker` instead.
pub async fn detailed_check(config: &ApplicationConfig) -> Report {
    DEFAULT_CHECKER.detailed_check(config).await
}

/// The checker behind [`detailed_check`].
pub fn default_checker() -> &'static HealthChecker {
    &DEFAULT_CHECKER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_checker_is_shared() {
        assert!(std::ptr::eq(default_checker(), default_checker()));
    }
}
