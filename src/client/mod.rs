//! @ai:module:intent Outreach REST API client and explicit session credentials
//! @ai:module:layer infrastructure
//! @ai:module:public_api ConsoleClient, ConsoleClientTrait, Credential, Session, KeyUpdate

pub mod console_client;
pub mod requests;
pub mod session;

pub use console_client::{error_detail, ConsoleClient, ConsoleClientTrait};
pub use requests::{
    AccountCreateRequest, ConversationList, ConversationUpdateRequest, DiffAction,
    KeyCreateRequest, KeyCreateResponse, KeyUpdate, LoginResponse, ModelScope,
    ModelSelectionUpdate, ReportLinks, ReportsOverview, StatusResponse, TaskCreateRequest,
};
pub use session::{Credential, Session, API_KEY_HEADER};
