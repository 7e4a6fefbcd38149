//! @ai:module:intent Task, instruction and dialogue types returned by the outreach API
//! @ai:module:layer domain
//! @ai:module:public_api Task, DialogueRecord, DialogueScores, RadarMetric, ConversationStatus, InstructionSet, InstructionDiff
//! @ai:module:stateless true

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Upper bound of the scale dialogue scores are reported on.
pub const SCORE_SCALE_MAX: f64 = 4.0;

/// @ai:intent Lifecycle state of a conversation or dialogue
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    InProgress,
    Completed,
    Failed,
}

impl ConversationStatus {
    /// @ai:intent Convert status to its wire representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::InProgress => "in_progress",
            ConversationStatus::Completed => "completed",
            ConversationStatus::Failed => "failed",
        }
    }

    /// @ai:intent Whether the dialogue reached a final outcome
    /// @ai:effects pure
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ConversationStatus::InProgress)
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Fixed set of dialogue quality metrics
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarMetric {
    Persuasion,
    BriefCompliance,
    Adaptability,
    AnswerQuality,
    Resilience,
    McpUsage,
}

impl RadarMetric {
    pub const ALL: [RadarMetric; 6] = [
        RadarMetric::Persuasion,
        RadarMetric::BriefCompliance,
        RadarMetric::Adaptability,
        RadarMetric::AnswerQuality,
        RadarMetric::Resilience,
        RadarMetric::McpUsage,
    ];

    /// @ai:intent Convert metric to its wire key
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            RadarMetric::Persuasion => "persuasion",
            RadarMetric::BriefCompliance => "brief_compliance",
            RadarMetric::Adaptability => "adaptability",
            RadarMetric::AnswerQuality => "answer_quality",
            RadarMetric::Resilience => "resilience",
            RadarMetric::McpUsage => "mcp_usage",
        }
    }

    /// @ai:intent Human readable label for reports
    /// @ai:effects pure
    pub fn label(&self) -> &'static str {
        match self {
            RadarMetric::Persuasion => "Persuasion",
            RadarMetric::BriefCompliance => "Brief compliance",
            RadarMetric::Adaptability => "Adaptability",
            RadarMetric::AnswerQuality => "Answer quality",
            RadarMetric::Resilience => "Resilience",
            RadarMetric::McpUsage => "MCP usage",
        }
    }

    /// @ai:intent Look up a metric by wire key
    /// @ai:effects pure
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }
}

impl std::fmt::Display for RadarMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Partial metric -> score mapping of one dialogue
///
/// A metric missing from the map was not scored. Decoding drops unknown
/// keys and non-numeric values, and treats a missing or non-object mapping
/// as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DialogueScores(BTreeMap<RadarMetric, f64>);

impl DialogueScores {
    /// @ai:intent Score for a metric, if it was scored
    /// @ai:effects pure
    pub fn get(&self, metric: RadarMetric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    /// @ai:intent Record a score, ignoring non-finite values
    /// @ai:effects pure
    pub fn insert(&mut self, metric: RadarMetric, score: f64) {
        if score.is_finite() {
            self.0.insert(metric, score);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RadarMetric, f64)> + '_ {
        self.0.iter().map(|(m, s)| (*m, *s))
    }
}

impl FromIterator<(RadarMetric, f64)> for DialogueScores {
    fn from_iter<I: IntoIterator<Item = (RadarMetric, f64)>>(iter: I) -> Self {
        let mut scores = DialogueScores::default();
        for (metric, score) in iter {
            scores.insert(metric, score);
        }
        scores
    }
}

impl<'de> Deserialize<'de> for DialogueScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;

        let serde_json::Value::Object(entries) = raw else {
            return Ok(DialogueScores::default());
        };

        Ok(entries
            .iter()
            .filter_map(|(key, value)| Some((RadarMetric::from_key(key)?, value.as_f64()?)))
            .collect())
    }
}

/// @ai:intent Parse an API timestamp, accepting naive UTC values
/// @ai:effects pure
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// @ai:intent Decode dialogue records, dropping entries that do not parse
fn deserialize_dialogues<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<DialogueRecord>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;

    let serde_json::Value::Array(entries) = raw else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<DialogueRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed dialogue record: {}", e);
                None
            }
        })
        .collect())
}

/// @ai:intent Outcome and quality scores of one attempted conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub conversation_id: Uuid,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub status: ConversationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metrics: DialogueScores,
}

/// @ai:intent A conversation handed to one messaging account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationAssignment {
    pub id: Uuid,
    pub telegram_account_id: Uuid,
    pub status: ConversationStatus,
    #[serde(default)]
    pub result: Option<String>,
}

/// @ai:intent External function the agent may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpFunction {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// @ai:intent File attached to a task brief
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// @ai:intent One version of the brief directing the conversational agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionSet {
    pub background: String,
    pub goal: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub response_rules: Vec<String>,
    pub communication_style: String,
    #[serde(default)]
    pub file_rules: Vec<String>,
    #[serde(default)]
    pub allowed_functions: Vec<McpFunction>,
    pub proactivity_level: String,
    #[serde(default)]
    pub telegram_account_id: Option<Uuid>,
}

/// @ai:intent Proposed change to one field of the current instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionDiff {
    pub field: String,
    pub previous: String,
    pub proposed: String,
}

/// @ai:intent Free-text outcome summary attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub conversion_rate: f64,
    pub comments: String,
    pub challenges: String,
    #[serde(default)]
    pub fun_facts: Vec<String>,
}

/// @ai:intent Unit of outreach work with its brief, conversations and outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub instruction_history: Vec<InstructionSet>,
    pub current_instruction: InstructionSet,
    #[serde(default)]
    pub diffs: Vec<InstructionDiff>,
    #[serde(default)]
    pub conversations: Vec<ConversationAssignment>,
    #[serde(default, deserialize_with = "deserialize_dialogues")]
    pub dialogues: Vec<DialogueRecord>,
    #[serde(default)]
    pub summary: Option<TaskSummary>,
}

impl Task {
    /// @ai:intent Check that the current instruction is the latest history entry
    /// @ai:effects pure
    pub fn instruction_is_consistent(&self) -> bool {
        self.instruction_history
            .last()
            .map(|latest| *latest == self.current_instruction)
            .unwrap_or(false)
    }

    /// @ai:intent Most recently appended dialogue record
    /// @ai:effects pure
    pub fn last_dialogue(&self) -> Option<&DialogueRecord> {
        self.dialogues.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{dialogue, instruction, task_with};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_metric_keys_round_trip_through_from_key() {
        for metric in RadarMetric::ALL {
            assert_eq!(RadarMetric::from_key(metric.as_str()), Some(metric));
        }
        assert_eq!(RadarMetric::from_key("charisma"), None);
    }

    #[test]
    fn test_scores_skip_unknown_and_non_numeric() {
        let scores: DialogueScores = serde_json::from_value(json!({
            "persuasion": 3,
            "resilience": "high",
            "charisma": 4,
            "mcp_usage": 2.5,
            "adaptability": null
        }))
        .unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get(RadarMetric::Persuasion), Some(3.0));
        assert_eq!(scores.get(RadarMetric::McpUsage), Some(2.5));
        assert_eq!(scores.get(RadarMetric::Resilience), None);
    }

    #[test]
    fn test_scores_tolerate_non_object_mapping() {
        let scores: DialogueScores = serde_json::from_value(json!(["persuasion", 3])).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_dialogue_with_missing_or_null_metrics() {
        let base = json!({
            "conversation_id": "6f1c1b7e-3f0a-4c8e-9b1a-2d3c4e5f6a7b",
            "timestamp": "2024-03-01T10:00:00.123456",
            "status": "completed"
        });
        let record: DialogueRecord = serde_json::from_value(base.clone()).unwrap();
        assert!(record.metrics.is_empty());

        let mut with_null = base;
        with_null["metrics"] = serde_json::Value::Null;
        let record: DialogueRecord = serde_json::from_value(with_null).unwrap();
        assert!(record.metrics.is_empty());
    }

    #[test]
    fn test_parse_timestamp_accepts_naive_and_rfc3339() {
        let naive = parse_timestamp("2024-03-01T10:00:00.5").unwrap();
        let zoned = parse_timestamp("2024-03-01T12:00:00.5+02:00").unwrap();
        assert_eq!(naive, zoned);
        assert!(parse_timestamp("2024-03-01T10:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_scores_serialize_with_wire_keys() {
        let scores: DialogueScores = [(RadarMetric::BriefCompliance, 4.0)].into_iter().collect();
        assert_eq!(serde_json::to_value(&scores).unwrap(), json!({"brief_compliance": 4.0}));
    }

    #[test]
    fn test_instruction_consistency() {
        let current = instruction("Book a demo");
        let task = Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Demo outreach".to_string(),
            description: String::new(),
            attachments: vec![],
            instruction_history: vec![instruction("Say hello"), current.clone()],
            current_instruction: current,
            diffs: vec![],
            conversations: vec![],
            dialogues: vec![],
            summary: None,
        };
        assert!(task.instruction_is_consistent());

        let mut drifted = task.clone();
        drifted.current_instruction = instruction("Sell harder");
        assert!(!drifted.instruction_is_consistent());

        let mut empty_history = task;
        empty_history.instruction_history.clear();
        assert!(!empty_history.instruction_is_consistent());
    }

    #[test]
    fn test_task_skips_malformed_dialogues() {
        let task = task_with(
            "Mixed",
            vec![dialogue(ConversationStatus::Completed, &[(RadarMetric::Persuasion, 3.0)])],
        );
        let mut value = serde_json::to_value(&task).unwrap();
        let good = value["dialogues"][0].clone();
        let mut empty_timestamp = good.clone();
        empty_timestamp["timestamp"] = json!("");
        let mut unknown_status = good.clone();
        unknown_status["status"] = json!("archived");
        value["dialogues"] = json!([empty_timestamp, good, unknown_status, "junk"]);

        let decoded: Task = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.dialogues.len(), 1);
        assert_eq!(decoded.dialogues[0].metrics.get(RadarMetric::Persuasion), Some(3.0));
    }

    #[test]
    fn test_task_with_null_dialogues() {
        let mut value = serde_json::to_value(task_with("Empty", vec![])).unwrap();
        value["dialogues"] = serde_json::Value::Null;

        let decoded: Task = serde_json::from_value(value).unwrap();
        assert!(decoded.dialogues.is_empty());
    }

    #[test]
    fn test_status_resolution() {
        assert!(ConversationStatus::Completed.is_resolved());
        assert!(ConversationStatus::Failed.is_resolved());
        assert!(!ConversationStatus::InProgress.is_resolved());
        assert_eq!(ConversationStatus::InProgress.to_string(), "in_progress");
    }
}
