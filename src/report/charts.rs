//! @ai:module:intent Chart generation for the dashboard summary
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::domain::SCORE_SCALE_MAX;
use crate::metrics::DashboardSummary;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

pub const METRICS_CHART: &str = "metrics.png";
pub const WEEKLY_CHART: &str = "weekly_completions.png";

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from a summary
    fn generate_all(&self, summary: &DashboardSummary, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Draws the metric bars and the weekly completion histogram
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Bar chart of the six metric averages on the 0-4 scale
    /// @ai:effects fs:write
    fn generate_metrics_chart(&self, summary: &DashboardSummary, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (900, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let data: Vec<(&str, f64)> = summary
            .metrics
            .iter()
            .map(|(metric, average)| (metric.label(), average.value))
            .collect();

        let mut chart = ChartBuilder::on(&root)
            .caption("Dialogue Quality", ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..data.len() as i32).into_segmented(), 0f64..SCORE_SCALE_MAX)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Average score")
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => data
                    .get(*i as usize)
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(12)
                .data(data.iter().enumerate().map(|(i, (_, value))| (i as i32, *value))),
        )?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Histogram of completed dialogues per week
    /// @ai:effects fs:write
    fn generate_weekly_chart(&self, summary: &DashboardSummary, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (900, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let weeks = &summary.weekly_completions;
        let peak = weeks.iter().map(|w| w.completed).max().unwrap_or(0).max(1);

        let mut chart = ChartBuilder::on(&root)
            .caption("Completed Dialogues per Week", ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..weeks.len().max(1) as i32).into_segmented(), 0u32..peak + 1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Completed")
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => weeks
                    .get(*i as usize)
                    .map(|w| w.week.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(GREEN.mix(0.7).filled())
                .margin(12)
                .data(weeks.iter().enumerate().map(|(i, w)| (i as i32, w.completed))),
        )?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts
    /// @ai:effects fs:write
    fn generate_all(&self, summary: &DashboardSummary, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        self.generate_metrics_chart(summary, &output_dir.join(METRICS_CHART))?;
        self.generate_weekly_chart(summary, &output_dir.join(WEEKLY_CHART))?;

        Ok(vec![METRICS_CHART.to_string(), WEEKLY_CHART.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{dialogue_at, task_with, timestamp};
    use crate::domain::{ConversationStatus, RadarMetric};
    use crate::metrics::MetricsAggregator;
    use tempfile::TempDir;

    #[test]
    fn test_generate_all_charts() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();

        let tasks = vec![task_with(
            "Charts",
            vec![
                dialogue_at(
                    ConversationStatus::Completed,
                    &[(RadarMetric::Adaptability, 3.5)],
                    timestamp(1),
                ),
                dialogue_at(ConversationStatus::Completed, &[], timestamp(12)),
            ],
        )];
        let summary = MetricsAggregator::new().summarize(&tasks, timestamp(20));

        let files = generator.generate_all(&summary, temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(temp.path().join(METRICS_CHART).exists());
        assert!(temp.path().join(WEEKLY_CHART).exists());
    }

    #[test]
    fn test_charts_for_empty_summary() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let summary = MetricsAggregator::new().summarize(&[], timestamp(20));

        generator.generate_all(&summary, temp.path()).unwrap();
        assert!(temp.path().join(WEEKLY_CHART).exists());
    }
}
