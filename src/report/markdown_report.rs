//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::domain::SCORE_SCALE_MAX;
use crate::error::Result;
use crate::metrics::{ActiveInstruction, DashboardSummary};
use std::fmt::{self, Write as FmtWrite};
use std::path::Path;

const BAR_WIDTH: usize = 10;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a dashboard summary
    fn generate(&self, summary: &DashboardSummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders the dashboard panels as Markdown
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Text bar for a score on the 0-4 scale
    /// @ai:effects pure
    fn format_bar(value: f64) -> String {
        let ratio = (value / SCORE_SCALE_MAX).clamp(0.0, 1.0);
        let filled = (ratio * BAR_WIDTH as f64).round() as usize;
        format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }

    /// @ai:intent Escape characters that would break a table cell
    /// @ai:effects pure
    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn write_header(out: &mut String, summary: &DashboardSummary) -> fmt::Result {
        writeln!(out, "# Outreach Report")?;
        writeln!(out)?;
        writeln!(out, "**Generated:** {}", summary.generated_at.to_rfc3339())?;
        writeln!(out, "**Tasks:** {}", summary.task_count)?;
        writeln!(out, "**Dialogues:** {}", summary.dialogue_count)?;
        writeln!(out)
    }

    fn write_conversion(out: &mut String, summary: &DashboardSummary) -> fmt::Result {
        let conversion = &summary.conversion;

        writeln!(out, "## Reporting")?;
        writeln!(out)?;
        writeln!(out, "| Completed | Failed | In progress | Conversion |")?;
        writeln!(out, "|-----------|--------|-------------|------------|")?;
        writeln!(
            out,
            "| {} | {} | {} | {:.1}% |",
            conversion.completed, conversion.failed, conversion.in_progress, conversion.rate
        )?;
        writeln!(out)
    }

    fn write_metrics(out: &mut String, summary: &DashboardSummary) -> fmt::Result {
        writeln!(out, "## Dialogue Quality")?;
        writeln!(out)?;
        writeln!(out, "| Metric | Average | Scored dialogues | |")?;
        writeln!(out, "|--------|---------|------------------|-|")?;

        for (metric, average) in &summary.metrics {
            let samples = if average.has_data() {
                average.samples.to_string()
            } else {
                "no data".to_string()
            };

            writeln!(
                out,
                "| {} | {:.1} / {} | {} | `{}` |",
                metric.label(),
                average.value,
                SCORE_SCALE_MAX,
                samples,
                Self::format_bar(average.value)
            )?;
        }

        writeln!(out)
    }

    fn write_tasks(out: &mut String, summary: &DashboardSummary) -> fmt::Result {
        writeln!(out, "## Tasks")?;
        writeln!(out)?;

        if summary.tasks.is_empty() {
            writeln!(out, "No tasks yet.")?;
            return writeln!(out);
        }

        writeln!(out, "| Title | Conversations | Dialogues | Last dialogue | Diff |")?;
        writeln!(out, "|-------|---------------|-----------|---------------|------|")?;

        for row in &summary.tasks {
            let last = row
                .last_dialogue_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());

            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                Self::escape_cell(&row.title),
                row.conversations,
                row.dialogues,
                last,
                row.review_state()
            )?;
        }

        writeln!(out)
    }

    fn write_weekly(out: &mut String, summary: &DashboardSummary) -> fmt::Result {
        if summary.weekly_completions.is_empty() {
            return Ok(());
        }

        writeln!(out, "## Weekly Completions")?;
        writeln!(out)?;
        writeln!(out, "| Week | Completed |")?;
        writeln!(out, "|------|-----------|")?;

        for week in &summary.weekly_completions {
            writeln!(out, "| {} | {} |", week.week, week.completed)?;
        }

        writeln!(out)
    }

    fn write_instruction(out: &mut String, active: &ActiveInstruction) -> fmt::Result {
        let instruction = &active.instruction;

        writeln!(out, "## Current Instruction: {}", active.title)?;
        writeln!(out)?;
        writeln!(out, "- **Background:** {}", instruction.background)?;
        writeln!(out, "- **Goal:** {}", instruction.goal)?;
        writeln!(out, "- **Steps:** {}", instruction.steps.join(" → "))?;
        writeln!(out, "- **Response rules:** {}", instruction.response_rules.join("; "))?;
        writeln!(out, "- **Style:** {}", instruction.communication_style)?;
        writeln!(out, "- **Files:** {}", instruction.file_rules.join("; "))?;
        writeln!(out)?;

        writeln!(out, "### Proposed Changes ({})", active.diffs.len())?;
        writeln!(out)?;

        if active.diffs.is_empty() {
            writeln!(out, "No new proposals.")?;
        }

        for diff in &active.diffs {
            writeln!(out, "- **{}**", diff.field)?;
            writeln!(out, "  - was: {}", diff.previous)?;
            writeln!(out, "  - proposed: {}", diff.proposed)?;
        }

        writeln!(out)
    }

    /// @ai:intent Render the full report
    /// @ai:effects pure
    pub fn render(summary: &DashboardSummary) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = Self::write_header(&mut out, summary)
            .and_then(|_| Self::write_conversion(&mut out, summary))
            .and_then(|_| Self::write_metrics(&mut out, summary))
            .and_then(|_| Self::write_tasks(&mut out, summary))
            .and_then(|_| Self::write_weekly(&mut out, summary))
            .and_then(|_| match &summary.active {
                Some(active) => Self::write_instruction(&mut out, active),
                None => Ok(()),
            });

        out
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, summary: &DashboardSummary, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render(summary))?;
        Ok(())
    }
}
