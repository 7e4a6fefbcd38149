//! @ai:module:intent Access keys, users and messaging accounts managed by admins
//! @ai:module:layer domain
//! @ai:module:public_api Key, KeyStatus, TelegramAccount, AccountStatus, User
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// @ai:intent Whether a key may authenticate
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    #[default]
    Active,
    Inactive,
}

impl KeyStatus {
    /// @ai:intent Convert status to its wire representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Availability of a messaging account
///
/// Statuses this client does not know decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Ready,
    Banned,
    #[serde(other)]
    Unknown,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Ready => "ready",
            AccountStatus::Banned => "banned",
            AccountStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Access credential scoping a user's permissions and default model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub id: Uuid,
    pub value: String,
    #[serde(default)]
    pub status: KeyStatus,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Weak references; accounts are owned by the API.
    #[serde(default)]
    pub telegram_account_ids: Vec<Uuid>,
    #[serde(default)]
    pub allow_model_selection: bool,
    #[serde(default)]
    pub task_model_overrides: HashMap<Uuid, String>,
    pub default_model: String,
}

impl Key {
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }

    /// @ai:intent Model used for a task, honouring per-task overrides
    /// @ai:effects pure
    pub fn model_for_task(&self, task_id: Uuid) -> &str {
        self.task_model_overrides
            .get(&task_id)
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }
}

/// @ai:intent External messaging identity usable by the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramAccount {
    pub id: Uuid,
    pub label: String,
    pub credentials: String,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub key_id: Option<Uuid>,
}

impl TelegramAccount {
    /// @ai:intent Short description of which key the account is bound to
    /// @ai:effects pure
    pub fn link_label(&self) -> String {
        match self.key_id {
            Some(key_id) => {
                let short: String = key_id.to_string().chars().take(4).collect();
                format!("linked to {short}...")
            }
            None => "free".to_string(),
        }
    }
}

/// @ai:intent Console user owning exactly one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub organization: String,
    pub key_id: Uuid,
}
