//! @ai:module:intent Result types for dialogue metric aggregation
//! @ai:module:layer domain
//! @ai:module:public_api MetricAverages, MetricAverage, ConversionStats, TaskRow, WeeklyCompletion, DashboardSummary
//! @ai:module:stateless true

use crate::domain::{InstructionDiff, InstructionSet, RadarMetric};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Mean score per metric; always holds all six metrics.
pub type MetricAverages = BTreeMap<RadarMetric, f64>;

/// Mean score per metric together with how many dialogues scored it.
pub type MetricBreakdown = BTreeMap<RadarMetric, MetricAverage>;

/// @ai:intent Rounded mean of one metric and its sample count
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAverage {
    pub value: f64,
    pub samples: u32,
}

impl MetricAverage {
    /// @ai:intent Whether any dialogue scored this metric
    /// @ai:effects pure
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }
}

/// @ai:intent Resolved dialogue counts and completion percentage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub completed: u32,
    pub failed: u32,
    pub in_progress: u32,
    /// Percentage of resolved dialogues that completed, one decimal.
    pub rate: f64,
}

/// @ai:intent One line of the task table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub task_id: Uuid,
    pub title: String,
    pub description: String,
    pub conversations: usize,
    pub dialogues: usize,
    pub last_dialogue_at: Option<DateTime<Utc>>,
    pub pending_diffs: usize,
}

impl TaskRow {
    /// @ai:intent Review state label shown in the diff column
    /// @ai:effects pure
    pub fn review_state(&self) -> &'static str {
        if self.pending_diffs > 0 {
            "under review"
        } else {
            "clean"
        }
    }
}

/// @ai:intent Completed dialogues within one calendar week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCompletion {
    /// `%Y-W%U` label, weeks starting on Sunday.
    pub week: String,
    pub completed: u32,
}

/// @ai:intent Instruction and pending diffs of the task shown in detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveInstruction {
    pub task_id: Uuid,
    pub title: String,
    pub instruction: InstructionSet,
    pub diffs: Vec<InstructionDiff>,
}

/// @ai:intent Everything the dashboard reports for a task collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub task_count: usize,
    pub dialogue_count: usize,
    pub metrics: MetricBreakdown,
    pub conversion: ConversionStats,
    pub weekly_completions: Vec<WeeklyCompletion>,
    pub tasks: Vec<TaskRow>,
    #[serde(default)]
    pub active: Option<ActiveInstruction>,
}

impl DashboardSummary {
    /// @ai:intent Project the breakdown onto plain averages
    /// @ai:effects pure
    pub fn averages(&self) -> MetricAverages {
        self.metrics.iter().map(|(m, avg)| (*m, avg.value)).collect()
    }
}
