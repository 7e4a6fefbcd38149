//! @ai:module:intent Outreach console library: API client, dialogue metrics and reports
//! @ai:module:layer application
//! @ai:module:public_api client, config, domain, error, metrics, report

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod report;

pub use client::{ConsoleClient, ConsoleClientTrait, Credential, Session};
pub use config::ConsoleConfig;
pub use domain::{DialogueRecord, Key, RadarMetric, SnapshotLoader, Task, TelegramAccount};
pub use error::{ConsoleError, Result};
pub use metrics::{DashboardSummary, MetricAverages, MetricsAggregator, MetricsAggregatorTrait};
pub use report::ReportGenerator;
