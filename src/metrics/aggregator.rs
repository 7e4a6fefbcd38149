//! @ai:module:intent Reduce task collections into dialogue quality metrics and conversion
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::domain::{ConversationStatus, RadarMetric, Task};
use crate::metrics::types::{
    ActiveInstruction, ConversionStats, DashboardSummary, MetricAverage, MetricAverages,
    MetricBreakdown, TaskRow, WeeklyCompletion,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Mean score per metric across all dialogues, one decimal, 0.0 when unscored
    fn aggregate(&self, tasks: &[Task]) -> MetricAverages;

    /// @ai:intent Percentage of resolved dialogues that completed, one decimal
    fn conversion_rate(&self, tasks: &[Task]) -> f64;
}

/// @ai:intent Aggregates dialogue records of fetched tasks
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Mean and sample count per metric
    /// @ai:effects pure
    pub fn metric_breakdown(&self, tasks: &[Task]) -> MetricBreakdown {
        RadarMetric::ALL
            .into_iter()
            .map(|metric| {
                let scores = tasks
                    .iter()
                    .flat_map(|t| &t.dialogues)
                    .filter_map(|d| d.metrics.get(metric));

                let (sum, samples) = scores.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

                let value = if samples == 0 {
                    0.0
                } else {
                    round_one_decimal(sum / samples as f64)
                };

                (metric, MetricAverage { value, samples })
            })
            .collect()
    }

    /// @ai:intent Completed, failed and in-progress counts with conversion rate
    /// @ai:effects pure
    pub fn conversion(&self, tasks: &[Task]) -> ConversionStats {
        let mut stats = ConversionStats::default();

        for dialogue in tasks.iter().flat_map(|t| &t.dialogues) {
            match dialogue.status {
                ConversationStatus::Completed => stats.completed += 1,
                ConversationStatus::Failed => stats.failed += 1,
                ConversationStatus::InProgress => stats.in_progress += 1,
            }
        }

        // No resolved dialogues: denominator of 1 yields 0.0.
        let resolved = tasks
            .iter()
            .flat_map(|t| &t.dialogues)
            .filter(|d| d.status.is_resolved())
            .count()
            .max(1);
        stats.rate = round_one_decimal(100.0 * stats.completed as f64 / resolved as f64);
        stats
    }

    /// @ai:intent Completed dialogues per `%Y-W%U` week, sorted by week
    /// @ai:effects pure
    pub fn weekly_completions(&self, tasks: &[Task]) -> Vec<WeeklyCompletion> {
        let mut weeks: BTreeMap<String, u32> = BTreeMap::new();

        for dialogue in tasks.iter().flat_map(|t| &t.dialogues) {
            let count = weeks
                .entry(dialogue.timestamp.format("%Y-W%U").to_string())
                .or_insert(0);

            if dialogue.status == ConversationStatus::Completed {
                *count += 1;
            }
        }

        weeks
            .into_iter()
            .map(|(week, completed)| WeeklyCompletion { week, completed })
            .collect()
    }

    /// @ai:intent One table row per task in input order
    /// @ai:effects pure
    pub fn task_rows(&self, tasks: &[Task]) -> Vec<TaskRow> {
        tasks
            .iter()
            .map(|task| TaskRow {
                task_id: task.id,
                title: task.title.clone(),
                description: task.description.clone(),
                conversations: task.conversations.len(),
                dialogues: task.dialogues.len(),
                last_dialogue_at: task.last_dialogue().map(|d| d.timestamp),
                pending_diffs: task.diffs.len(),
            })
            .collect()
    }

    /// @ai:intent Build the full dashboard summary; the first task is the active one
    /// @ai:effects pure
    pub fn summarize(&self, tasks: &[Task], generated_at: DateTime<Utc>) -> DashboardSummary {
        let active = tasks.first().map(|task| ActiveInstruction {
            task_id: task.id,
            title: task.title.clone(),
            instruction: task.current_instruction.clone(),
            diffs: task.diffs.clone(),
        });

        DashboardSummary {
            generated_at,
            task_count: tasks.len(),
            dialogue_count: tasks.iter().map(|t| t.dialogues.len()).sum(),
            metrics: self.metric_breakdown(tasks),
            conversion: self.conversion(tasks),
            weekly_completions: self.weekly_completions(tasks),
            tasks: self.task_rows(tasks),
            active,
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Mean score per metric
    /// @ai:effects pure
    fn aggregate(&self, tasks: &[Task]) -> MetricAverages {
        self.metric_breakdown(tasks)
            .into_iter()
            .map(|(metric, avg)| (metric, avg.value))
            .collect()
    }

    /// @ai:intent Conversion percentage over resolved dialogues
    /// @ai:effects pure
    fn conversion_rate(&self, tasks: &[Task]) -> f64 {
        self.conversion(tasks).rate
    }
}

/// @ai:intent Round to one decimal place
/// @ai:effects pure
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{dialogue, dialogue_at, task_with, timestamp};
    use crate::domain::InstructionDiff;
    use crate::domain::RadarMetric::*;
    use pretty_assertions::assert_eq;

    fn completed(scores: &[(RadarMetric, f64)]) -> crate::domain::DialogueRecord {
        dialogue(ConversationStatus::Completed, scores)
    }

    #[test]
    fn test_round_one_decimal() {
        assert!((round_one_decimal(66.666) - 66.7).abs() < 1e-9);
        assert!((round_one_decimal(2.94) - 2.9).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_returns_all_zero() {
        let averages = MetricsAggregator::new().aggregate(&[]);

        assert_eq!(averages.len(), 6);
        assert!(averages.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_aggregate_single_metric() {
        let tasks = vec![task_with(
            "Outreach",
            vec![
                completed(&[(Persuasion, 3.0)]),
                completed(&[(Persuasion, 4.0)]),
                completed(&[(Persuasion, 2.0)]),
            ],
        )];

        let averages = MetricsAggregator::new().aggregate(&tasks);

        let expected: MetricAverages = [
            (Persuasion, 3.0),
            (BriefCompliance, 0.0),
            (Adaptability, 0.0),
            (AnswerQuality, 0.0),
            (Resilience, 0.0),
            (McpUsage, 0.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(averages, expected);
    }

    #[test]
    fn test_aggregate_skips_missing_scores_instead_of_zeroing() {
        let tasks = vec![
            task_with("a", vec![completed(&[(Resilience, 4.0)]), completed(&[])]),
            task_with("b", vec![completed(&[(Resilience, 3.0), (McpUsage, 1.0)])]),
        ];

        let averages = MetricsAggregator::new().aggregate(&tasks);
        assert_eq!(averages[&Resilience], 3.5);
        assert_eq!(averages[&McpUsage], 1.0);
    }

    #[test]
    fn test_aggregate_ignores_non_numeric_scores() {
        let record: crate::domain::DialogueRecord = serde_json::from_value(serde_json::json!({
            "conversation_id": "6f1c1b7e-3f0a-4c8e-9b1a-2d3c4e5f6a7b",
            "timestamp": "2024-03-01T10:00:00",
            "status": "completed",
            "metrics": {"persuasion": "excellent", "adaptability": 2}
        }))
        .unwrap();
        let tasks = vec![task_with("a", vec![record, completed(&[(Persuasion, 2.0)])])];

        let breakdown = MetricsAggregator::new().metric_breakdown(&tasks);
        assert_eq!(breakdown[&Persuasion], MetricAverage { value: 2.0, samples: 1 });
        assert_eq!(breakdown[&Adaptability], MetricAverage { value: 2.0, samples: 1 });
    }

    #[test]
    fn test_aggregate_stays_within_observed_range() {
        let scores = [1.0, 4.0, 2.0, 3.0, 3.0, 1.0, 4.0];
        let dialogues = scores.iter().map(|s| completed(&[(AnswerQuality, *s)])).collect();
        let tasks = vec![task_with("a", dialogues)];

        let value = MetricsAggregator::new().aggregate(&tasks)[&AnswerQuality];
        assert!((1.0..=4.0).contains(&value));
        assert_eq!(value, 2.6);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let a = task_with(
            "a",
            vec![completed(&[(Persuasion, 1.0), (Resilience, 2.0)]), completed(&[(Persuasion, 4.0)])],
        );
        let b = task_with("b", vec![completed(&[(Persuasion, 3.0), (Resilience, 3.0)])]);

        let aggregator = MetricsAggregator::new();
        let forward = aggregator.aggregate(&[a.clone(), b.clone()]);

        let mut reversed_a = a;
        reversed_a.dialogues.reverse();
        let backward = aggregator.aggregate(&[b, reversed_a]);

        assert_eq!(forward, backward);
        assert_eq!(forward[&Persuasion], 2.7);
        assert_eq!(forward[&Resilience], 2.5);
    }

    #[test]
    fn test_conversion_rate_empty_is_zero() {
        let rate = MetricsAggregator::new().conversion_rate(&[]);
        assert_eq!(rate, 0.0);
        assert!(!rate.is_nan());
    }

    #[test]
    fn test_conversion_rate_two_of_three() {
        let tasks = vec![task_with(
            "a",
            vec![
                dialogue(ConversationStatus::Completed, &[]),
                dialogue(ConversationStatus::Completed, &[]),
                dialogue(ConversationStatus::Failed, &[]),
            ],
        )];

        assert_eq!(MetricsAggregator::new().conversion_rate(&tasks), 66.7);
    }

    #[test]
    fn test_conversion_ignores_in_progress() {
        let aggregator = MetricsAggregator::new();
        let resolved = vec![
            dialogue(ConversationStatus::Completed, &[]),
            dialogue(ConversationStatus::Failed, &[]),
        ];
        let mut with_pending = resolved.clone();
        with_pending.push(dialogue(ConversationStatus::InProgress, &[]));
        with_pending.push(dialogue(ConversationStatus::InProgress, &[]));

        let base = aggregator.conversion(&[task_with("a", resolved)]);
        let pending = aggregator.conversion(&[task_with("a", with_pending)]);

        assert_eq!(base.rate, 50.0);
        assert_eq!(pending.rate, 50.0);
        assert_eq!(pending.in_progress, 2);
    }

    #[test]
    fn test_conversion_only_in_progress_is_zero() {
        let tasks = vec![task_with("a", vec![dialogue(ConversationStatus::InProgress, &[])])];
        let stats = MetricsAggregator::new().conversion(&tasks);

        assert_eq!(stats, ConversionStats { completed: 0, failed: 0, in_progress: 1, rate: 0.0 });
    }

    #[test]
    fn test_weekly_completions_groups_by_week() {
        let tasks = vec![task_with(
            "a",
            vec![
                // 2024-03-01 is a Friday, 2024-03-03 the following Sunday.
                dialogue_at(ConversationStatus::Completed, &[], timestamp(1)),
                dialogue_at(ConversationStatus::Completed, &[], timestamp(2)),
                dialogue_at(ConversationStatus::Failed, &[], timestamp(3)),
            ],
        )];

        let weeks = MetricsAggregator::new().weekly_completions(&tasks);
        assert_eq!(
            weeks,
            vec![
                WeeklyCompletion { week: "2024-W08".to_string(), completed: 2 },
                WeeklyCompletion { week: "2024-W09".to_string(), completed: 0 },
            ]
        );
    }

    #[test]
    fn test_task_rows() {
        let mut task = task_with(
            "Warm leads",
            vec![
                dialogue_at(ConversationStatus::Completed, &[], timestamp(1)),
                dialogue_at(ConversationStatus::Failed, &[], timestamp(5)),
            ],
        );
        task.diffs.push(InstructionDiff {
            field: "steps".to_string(),
            previous: "Introduce".to_string(),
            proposed: "Introduce; Add onboarding reminder".to_string(),
        });

        let rows = MetricsAggregator::new().task_rows(&[task.clone(), task_with("Empty", vec![])]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dialogues, 2);
        assert_eq!(rows[0].last_dialogue_at, Some(timestamp(5)));
        assert_eq!(rows[0].review_state(), "under review");
        assert_eq!(rows[1].last_dialogue_at, None);
        assert_eq!(rows[1].review_state(), "clean");
    }

    #[test]
    fn test_summarize_uses_first_task_as_active() {
        let tasks = vec![
            task_with("First", vec![completed(&[(Persuasion, 4.0)])]),
            task_with("Second", vec![dialogue(ConversationStatus::Failed, &[])]),
        ];

        let summary = MetricsAggregator::new().summarize(&tasks, timestamp(10));

        assert_eq!(summary.task_count, 2);
        assert_eq!(summary.dialogue_count, 2);
        assert_eq!(summary.conversion.rate, 50.0);
        assert_eq!(summary.active.as_ref().map(|a| a.title.as_str()), Some("First"));
        assert_eq!(summary.averages()[&Persuasion], 4.0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = MetricsAggregator::new().summarize(&[], timestamp(10));

        assert!(summary.active.is_none());
        assert!(summary.tasks.is_empty());
        assert_eq!(summary.metrics.len(), 6);
        assert!(summary.metrics.values().all(|m| !m.has_data()));
    }
}
