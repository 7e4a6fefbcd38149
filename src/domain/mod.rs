//! @ai:module:intent Outreach API domain types and task snapshot loading
//! @ai:module:layer domain
//! @ai:module:public_api Task, DialogueRecord, RadarMetric, Key, TelegramAccount, SnapshotLoader

pub mod access;
pub mod loader;
pub mod task;

#[cfg(test)]
pub(crate) mod fixtures;

pub use access::{AccountStatus, Key, KeyStatus, TelegramAccount, User};
pub use loader::{SnapshotLoader, SnapshotLoaderTrait};
pub use task::{
    parse_timestamp, Attachment, ConversationAssignment, ConversationStatus, DialogueRecord,
    DialogueScores, InstructionDiff, InstructionSet, McpFunction, RadarMetric, Task, TaskSummary,
    SCORE_SCALE_MAX,
};
