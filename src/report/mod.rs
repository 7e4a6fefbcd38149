//! @ai:module:intent Report generation for dashboard summaries
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::DashboardSummary;
use anyhow::Result;
use std::path::Path;

pub const JSON_REPORT: &str = "summary.json";
pub const MARKDOWN_REPORT: &str = "summary.md";

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: Option<ChartGenerator>,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator with charts enabled
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: Some(ChartGenerator::new()),
        }
    }

    /// @ai:intent Toggle PNG chart rendering
    /// @ai:effects pure
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.charts = enabled.then(ChartGenerator::new);
        self
    }

    /// @ai:intent Generate all reports, returning the written file names
    /// @ai:effects fs:write
    pub fn generate_all(&self, summary: &DashboardSummary, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(summary, &output_dir.join(JSON_REPORT))?;
        self.markdown.generate(summary, &output_dir.join(MARKDOWN_REPORT))?;

        let mut written = vec![JSON_REPORT.to_string(), MARKDOWN_REPORT.to_string()];
        if let Some(charts) = &self.charts {
            written.extend(charts.generate_all(summary, output_dir)?);
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(written)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{dialogue, task_with, timestamp};
    use crate::domain::ConversationStatus;
    use crate::metrics::MetricsAggregator;
    use tempfile::TempDir;

    #[test]
    fn test_generate_without_charts() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested/reports");
        let tasks = vec![task_with("t", vec![dialogue(ConversationStatus::Completed, &[])])];
        let summary = MetricsAggregator::new().summarize(&tasks, timestamp(5));

        let written = ReportGenerator::new()
            .with_charts(false)
            .generate_all(&summary, &out)
            .unwrap();

        assert_eq!(written, vec![JSON_REPORT.to_string(), MARKDOWN_REPORT.to_string()]);
        assert!(out.join(JSON_REPORT).exists());
        assert!(!out.join(charts::METRICS_CHART).exists());
    }
}
