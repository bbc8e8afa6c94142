use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::error::VoteError;

/// The signed-in viewer, passed explicitly to anything that mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Uuid,
    pub display_name: Option<String>,
}

pub fn require_identity(identity: Option<&Identity>) -> Result<&Identity, VoteError> {
    identity.ok_or(VoteError::NotAuthenticated)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
