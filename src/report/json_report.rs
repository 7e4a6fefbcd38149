//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::error::Result;
use crate::metrics::DashboardSummary;
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from a dashboard summary
    fn generate(&self, summary: &DashboardSummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes the dashboard summary as pretty JSON
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn generate(&self, summary: &DashboardSummary, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{dialogue, task_with, timestamp};
    use crate::domain::{ConversationStatus, RadarMetric};
    use crate::metrics::MetricsAggregator;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("summary.json");

        let tasks = vec![task_with(
            "Partner search",
            vec![dialogue(ConversationStatus::Completed, &[(RadarMetric::McpUsage, 3.0)])],
        )];
        let summary = MetricsAggregator::new().summarize(&tasks, timestamp(4));

        reporter.generate(&summary, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("Partner search"));
        assert!(content.contains("\"mcp_usage\""));

        let parsed: DashboardSummary = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, summary);
    }
}
