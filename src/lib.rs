// src/lib.rs
pub mod config;
pub mod health;
pub mod metrics;
pub mod probe;
pub mod server;

pub use config::{ApplicationConfig, IntegrationConfig};
pub use health::{detailed_check, simple_check, HealthChecker, Integration, Report, SimpleStatus};
