//! Authenticated user and bearer session.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// The logged-in user as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id (`_id` on the wire).
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Response body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token to attach to subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_document_id() {
        let session: AuthSession = serde_json::from_str(
            r#"{"token":"t0k","user":{"_id":"u1","name":"Ada","email":"ada@example.com"}}"#,
        )
        .unwrap();
        assert_eq!(session.user.id.as_str(), "u1");
        assert_eq!(session.token, "t0k");
    }

    #[test]
    fn test_user_accepts_plain_id() {
        let user: User =
            serde_json::from_str(r#"{"id":"u2","name":"Lin","email":"lin@example.com"}"#).unwrap();
        assert_eq!(user.id.as_str(), "u2");
    }
}
