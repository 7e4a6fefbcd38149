//! @ai:module:intent HTTP client for the outreach REST API
//! @ai:module:layer infrastructure
//! @ai:module:public_api ConsoleClient, ConsoleClientTrait
//! @ai:module:stateless true

use crate::client::requests::{
    AccountAssignmentRequest, AccountCreateRequest, ConversationCreateRequest, ConversationList,
    ConversationUpdateRequest, DiffAction, DiffActionRequest, InstructionUpdateRequest,
    KeyCreateRequest, KeyCreateResponse, KeyUpdate, LoginRequest, LoginResponse,
    ModelSelectionUpdate, ReportLinks, ReportsOverview, StatusResponse, TaskCreateRequest,
};
use crate::client::session::{Credential, Session, API_KEY_HEADER};
use crate::config::ApiConfig;
use crate::domain::{
    DialogueScores, InstructionDiff, InstructionSet, Key, RadarMetric, Task, TaskSummary,
    TelegramAccount,
};
use crate::error::{ConsoleError, Result};
use crate::metrics::MetricAverages;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// @ai:intent Operations the console performs against the outreach API
///
/// Every authenticated call takes the credential explicitly; the client
/// holds no session state.
#[allow(async_fn_in_trait)]
pub trait ConsoleClientTrait: Send + Sync {
    async fn login(&self, key_value: &str) -> Result<LoginResponse>;

    async fn list_tasks(&self, credential: &Credential) -> Result<Vec<Task>>;

    async fn get_task(&self, credential: &Credential, task_id: Uuid) -> Result<Task>;

    async fn list_conversations(
        &self,
        credential: &Credential,
        task_id: Uuid,
        ids: &[Uuid],
    ) -> Result<ConversationList>;

    async fn submit_conversations(
        &self,
        credential: &Credential,
        task_id: Uuid,
        account_ids: &[Uuid],
    ) -> Result<Task>;

    async fn list_keys(&self, credential: &Credential) -> Result<Vec<Key>>;

    async fn create_key(
        &self,
        credential: &Credential,
        request: &KeyCreateRequest,
    ) -> Result<KeyCreateResponse>;

    async fn update_key(
        &self,
        credential: &Credential,
        key_id: Uuid,
        update: &KeyUpdate,
    ) -> Result<Key>;

    async fn list_accounts(&self, credential: &Credential) -> Result<Vec<TelegramAccount>>;

    async fn create_account(
        &self,
        credential: &Credential,
        request: &AccountCreateRequest,
    ) -> Result<TelegramAccount>;

    async fn update_model_selection(
        &self,
        credential: &Credential,
        key_id: Uuid,
        update: &ModelSelectionUpdate,
    ) -> Result<Key>;

    async fn assign_account(
        &self,
        credential: &Credential,
        account_id: Uuid,
        key_id: Uuid,
    ) -> Result<TelegramAccount>;

    async fn export_reports(&self, credential: &Credential) -> Result<ReportLinks>;

    async fn reports_overview(&self, credential: &Credential) -> Result<ReportsOverview>;

    async fn reports_metrics(&self, credential: &Credential) -> Result<MetricAverages>;

    async fn email_report(&self, credential: &Credential) -> Result<StatusResponse>;
}

/// @ai:intent reqwest-backed outreach API client
pub struct ConsoleClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConsoleClient {
    /// @ai:intent Create a client for the configured API
    /// @ai:effects pure
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// @ai:intent Validate a key and bind it into a session
    /// @ai:effects network
    pub async fn open_session(&self, key_value: &str) -> Result<Session> {
        let credential = Credential::new(key_value);
        let identity = self.login(credential.as_str()).await?;
        Ok(Session::new(credential, identity))
    }

    /// @ai:intent Start a request, attaching the credential when given
    /// @ai:effects pure
    fn request(&self, method: Method, path: &str, credential: Option<&Credential>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let builder = self.client.request(method, url);

        match credential {
            Some(credential) => builder.header(API_KEY_HEADER, credential.as_str()),
            None => builder,
        }
    }

    /// @ai:intent Send a request and decode a JSON body, mapping failures to `ConsoleError`
    /// @ai:effects network
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, context: &str) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(status, &body);
            tracing::debug!("{} failed with {}: {}", context, status, detail);
            return Err(ConsoleError::Api { status, detail });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ConsoleError::Decode {
            context: context.to_string(),
            source,
        })
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        credential: Option<&Credential>,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path, credential).json(body);
        self.send(builder, path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, credential: &Credential) -> Result<T> {
        let builder = self.request(Method::GET, path, Some(credential));
        self.send(builder, path).await
    }

    /// @ai:intent Liveness check
    /// @ai:effects network
    pub async fn health(&self) -> Result<StatusResponse> {
        let builder = self.request(Method::GET, "/health", None);
        self.send(builder, "/health").await
    }

    /// @ai:intent Create a task with its first instruction version
    /// @ai:effects network
    pub async fn create_task(&self, credential: &Credential, request: &TaskCreateRequest) -> Result<Task> {
        self.post_json("/tasks", Some(credential), request).await
    }

    /// @ai:intent Append a new instruction version to a task
    /// @ai:effects network
    pub async fn update_instruction(
        &self,
        credential: &Credential,
        task_id: Uuid,
        instruction: &InstructionSet,
    ) -> Result<Task> {
        let path = format!("/tasks/{task_id}/instruction");
        self.post_json(&path, Some(credential), &InstructionUpdateRequest { instruction })
            .await
    }

    /// @ai:intent Accept, reject or propose an instruction diff
    /// @ai:effects network
    pub async fn review_diff(
        &self,
        credential: &Credential,
        task_id: Uuid,
        diff: &InstructionDiff,
        action: DiffAction,
    ) -> Result<Task> {
        let path = format!("/tasks/{task_id}/diffs");
        self.post_json(&path, Some(credential), &DiffActionRequest { diff, action })
            .await
    }

    /// @ai:intent Record the outcome of one conversation
    /// @ai:effects network
    pub async fn update_conversation(
        &self,
        credential: &Credential,
        task_id: Uuid,
        conversation_id: Uuid,
        request: &ConversationUpdateRequest,
    ) -> Result<Task> {
        let path = format!("/tasks/{task_id}/conversations/{conversation_id}");
        let builder = self
            .request(Method::PATCH, &path, Some(credential))
            .json(request);
        self.send(builder, &path).await
    }

    /// @ai:intent Attach an outcome summary to a task
    /// @ai:effects network
    pub async fn update_summary(
        &self,
        credential: &Credential,
        task_id: Uuid,
        summary: &TaskSummary,
    ) -> Result<Task> {
        let path = format!("/tasks/{task_id}/summary");
        self.post_json(&path, Some(credential), summary).await
    }
}

impl ConsoleClientTrait for ConsoleClient {
    /// @ai:intent Exchange a key value for its identity
    /// @ai:effects network
    async fn login(&self, key_value: &str) -> Result<LoginResponse> {
        self.post_json("/auth/login", None, &LoginRequest { key_value })
            .await
    }

    /// @ai:intent Tasks owned by the key's user
    /// @ai:effects network
    async fn list_tasks(&self, credential: &Credential) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self.get_json("/tasks", credential).await?;
        tracing::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn get_task(&self, credential: &Credential, task_id: Uuid) -> Result<Task> {
        self.get_json(&format!("/tasks/{task_id}"), credential).await
    }

    /// @ai:intent Conversations of a task, optionally restricted to `ids`
    /// @ai:effects network
    async fn list_conversations(
        &self,
        credential: &Credential,
        task_id: Uuid,
        ids: &[Uuid],
    ) -> Result<ConversationList> {
        let path = format!("/tasks/{task_id}/conversations");
        let query: Vec<(&str, String)> = ids.iter().map(|id| ("ids", id.to_string())).collect();
        let builder = self
            .request(Method::GET, &path, Some(credential))
            .query(&query);
        self.send(builder, &path).await
    }

    /// @ai:intent Start one conversation per messaging account
    /// @ai:effects network
    async fn submit_conversations(
        &self,
        credential: &Credential,
        task_id: Uuid,
        account_ids: &[Uuid],
    ) -> Result<Task> {
        let path = format!("/tasks/{task_id}/conversations");
        let body = ConversationCreateRequest {
            telegram_account_ids: account_ids,
        };
        self.post_json(&path, Some(credential), &body).await
    }

    async fn list_keys(&self, credential: &Credential) -> Result<Vec<Key>> {
        self.get_json("/admin/keys", credential).await
    }

    /// @ai:intent Issue a key together with its user
    /// @ai:effects network
    async fn create_key(
        &self,
        credential: &Credential,
        request: &KeyCreateRequest,
    ) -> Result<KeyCreateResponse> {
        self.post_json("/admin/keys", Some(credential), request).await
    }

    /// @ai:intent Apply a partial key update
    /// @ai:effects network
    async fn update_key(
        &self,
        credential: &Credential,
        key_id: Uuid,
        update: &KeyUpdate,
    ) -> Result<Key> {
        let path = format!("/admin/keys/{key_id}");
        let builder = self
            .request(Method::PATCH, &path, Some(credential))
            .query(update);
        self.send(builder, &path).await
    }

    async fn list_accounts(&self, credential: &Credential) -> Result<Vec<TelegramAccount>> {
        self.get_json("/admin/telegram-accounts", credential).await
    }

    async fn create_account(
        &self,
        credential: &Credential,
        request: &AccountCreateRequest,
    ) -> Result<TelegramAccount> {
        self.post_json("/admin/telegram-accounts", Some(credential), request)
            .await
    }

    /// @ai:intent Links to generated PDF and Word reports
    /// @ai:effects network
    async fn export_reports(&self, credential: &Credential) -> Result<ReportLinks> {
        self.get_json("/reports/export", credential).await
    }

    /// @ai:intent Change the default or per-task model of a key
    /// @ai:effects network
    async fn update_model_selection(
        &self,
        credential: &Credential,
        key_id: Uuid,
        update: &ModelSelectionUpdate,
    ) -> Result<Key> {
        let path = format!("/admin/model-selection/{key_id}");
        self.post_json(&path, Some(credential), update).await
    }

    /// @ai:intent Bind a messaging account to a key
    /// @ai:effects network
    async fn assign_account(
        &self,
        credential: &Credential,
        account_id: Uuid,
        key_id: Uuid,
    ) -> Result<TelegramAccount> {
        let path = format!("/admin/telegram-accounts/{account_id}");
        let body = AccountAssignmentRequest {
            telegram_account_id: account_id,
            key_id,
        };
        let builder = self
            .request(Method::PATCH, &path, Some(credential))
            .json(&body);
        self.send(builder, &path).await
    }

    /// @ai:intent Server-side weekly completion counts
    /// @ai:effects network
    async fn reports_overview(&self, credential: &Credential) -> Result<ReportsOverview> {
        self.get_json("/reports/overview", credential).await
    }

    /// @ai:intent Server-side metric averages, normalised to all six metrics
    /// @ai:effects network
    async fn reports_metrics(&self, credential: &Credential) -> Result<MetricAverages> {
        let scores: DialogueScores = self.get_json("/reports/metrics", credential).await?;

        Ok(RadarMetric::ALL
            .into_iter()
            .map(|metric| (metric, scores.get(metric).unwrap_or(0.0)))
            .collect())
    }

    /// @ai:intent Queue the report e-mail
    /// @ai:effects network
    async fn email_report(&self, credential: &Credential) -> Result<StatusResponse> {
        self.get_json("/reports/email", credential).await
    }
}

/// @ai:intent User-facing message for a failed response
///
/// The server's `detail` string when present, else the status reason.
/// @ai:effects pure
pub fn error_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(message)) => message,
        Some(serde_json::Value::Null) | None => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string()),
        Some(other) => other.to_string(),
    }
}
