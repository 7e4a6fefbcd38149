//! Shared builders for unit tests.

use crate::domain::{
    ConversationStatus, DialogueRecord, DialogueScores, InstructionSet, RadarMetric, Task,
};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

pub fn instruction(goal: &str) -> InstructionSet {
    InstructionSet {
        background: "Regional logistics company".to_string(),
        goal: goal.to_string(),
        steps: vec!["Introduce".to_string(), "Qualify".to_string(), "Book call".to_string()],
        response_rules: vec!["Be brief".to_string(), "No prices".to_string()],
        communication_style: "friendly".to_string(),
        file_rules: vec!["Send deck on request".to_string()],
        allowed_functions: vec![],
        proactivity_level: "medium".to_string(),
        telegram_account_id: None,
    }
}

pub fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap()
}

pub fn dialogue_at(
    status: ConversationStatus,
    scores: &[(RadarMetric, f64)],
    at: DateTime<Utc>,
) -> DialogueRecord {
    DialogueRecord {
        conversation_id: Uuid::new_v4(),
        timestamp: at,
        status,
        notes: None,
        metrics: scores.iter().copied().collect::<DialogueScores>(),
    }
}

pub fn dialogue(status: ConversationStatus, scores: &[(RadarMetric, f64)]) -> DialogueRecord {
    dialogue_at(status, scores, timestamp(1))
}

pub fn task_with(title: &str, dialogues: Vec<DialogueRecord>) -> Task {
    let current = instruction("Book a demo");

    Task {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{title} description"),
        attachments: vec![],
        instruction_history: vec![current.clone()],
        current_instruction: current,
        diffs: vec![],
        conversations: vec![],
        dialogues,
        summary: None,
    }
}
