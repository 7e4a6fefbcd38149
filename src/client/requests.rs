//! @ai:module:intent Request and response bodies of the outreach REST API
//! @ai:module:layer infrastructure
//! @ai:module:public_api LoginRequest, LoginResponse, KeyUpdate, ModelSelectionUpdate, DiffAction, ReportLinks
//! @ai:module:stateless true

use crate::domain::{
    AccountStatus, Attachment, ConversationAssignment, ConversationStatus, DialogueScores,
    InstructionDiff, InstructionSet, Key, KeyStatus, User,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub key_value: &'a str,
}

/// @ai:intent Identity and model permissions bound to a key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub key_id: Uuid,
    pub user_id: Uuid,
    pub allow_model_selection: bool,
    pub default_model: String,
}

/// @ai:intent New task with its first instruction version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreateRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub instruction: InstructionSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructionUpdateRequest<'a> {
    pub instruction: &'a InstructionSet,
}

/// @ai:intent What to do with a diff proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAction {
    Accept,
    Reject,
    /// Queue the diff as a new proposal.
    Propose,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffActionRequest<'a> {
    pub diff: &'a InstructionDiff,
    pub action: DiffAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationCreateRequest<'a> {
    pub telegram_account_ids: &'a [Uuid],
}

/// @ai:intent Outcome report for one conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationUpdateRequest {
    pub status: ConversationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<DialogueScores>,
}

/// @ai:intent Conversations of a task with their rolled-up status
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationList {
    pub task_id: Uuid,
    pub status: ConversationStatus,
    #[serde(default)]
    pub conversations: Vec<ConversationAssignment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyCreateRequest {
    pub email: String,
    pub organization: String,
    pub status: KeyStatus,
}

/// @ai:intent Newly issued key and the user created with it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyCreateResponse {
    pub key: Key,
    pub user: User,
}

/// @ai:intent Typed partial update of a key; unset fields are left alone
///
/// Sent as query parameters, so only populated fields are encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_model_selection: Option<bool>,
    #[serde(rename = "status_value", skip_serializing_if = "Option::is_none")]
    pub status: Option<KeyStatus>,
}

impl KeyUpdate {
    pub fn allow_model_selection(allow: bool) -> Self {
        Self {
            allow_model_selection: Some(allow),
            ..Default::default()
        }
    }

    pub fn status(status: KeyStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allow_model_selection.is_none() && self.status.is_none()
    }
}

/// @ai:intent Whether a model choice applies to the whole key or one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelScope {
    Global,
    Task,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSelectionUpdate {
    pub scope: ModelScope,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
}

impl ModelSelectionUpdate {
    /// @ai:intent Change the key's default model
    pub fn global(model_name: impl Into<String>) -> Self {
        Self {
            scope: ModelScope::Global,
            model_name: model_name.into(),
            task_id: None,
        }
    }

    /// @ai:intent Override the model for a single task
    pub fn for_task(task_id: Uuid, model_name: impl Into<String>) -> Self {
        Self {
            scope: ModelScope::Task,
            model_name: model_name.into(),
            task_id: Some(task_id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountCreateRequest {
    pub label: String,
    pub credentials: String,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountAssignmentRequest {
    pub telegram_account_id: Uuid,
    pub key_id: Uuid,
}

/// @ai:intent Server-side completed dialogue counts per week
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportsOverview {
    #[serde(default)]
    pub weekly_conversion: BTreeMap<String, f64>,
}

/// @ai:intent Download links of generated report documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLinks {
    pub pdf: String,
    pub docx: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
