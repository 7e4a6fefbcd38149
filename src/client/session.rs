//! @ai:module:intent Explicit credential and session values threaded through API calls
//! @ai:module:layer domain
//! @ai:module:public_api Credential, Session
//! @ai:module:stateless true

use crate::client::requests::LoginResponse;

/// Header carrying the access key on every authenticated request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// @ai:intent Opaque access key; never printed in full
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// @ai:intent Wrap a key value, trimming surrounding whitespace
    /// @ai:effects pure
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.chars().count() <= 4 {
            return write!(f, "Credential(***)");
        }

        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "Credential({prefix}***)")
    }
}

/// @ai:intent A credential together with the login response that validated it
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub credential: Credential,
    pub identity: LoginResponse,
}

impl Session {
    pub fn new(credential: Credential, identity: LoginResponse) -> Self {
        Self {
            credential,
            identity,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
