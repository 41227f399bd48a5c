//! Identity and persisted learn-request rows.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Authenticated user as reported by the identity service.
///
/// Only `id` and `email` are consumed; everything else the service
/// returns is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Row payload inserted when a question is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLearnRequest {
    pub user_id: Uuid,
    pub input_text: String,
}

impl NewLearnRequest {
    pub fn new(user_id: Uuid, input_text: impl Into<String>) -> Self {
        Self {
            user_id,
            input_text: input_text.into(),
        }
    }
}

/// Patch payload written once the completion API answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnResponseUpdate {
    pub openai_response: String,
}

/// A persisted question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnRequest {
    pub id: LearnRequestId,
    pub user_id: Uuid,
    pub input_text: String,
    #[serde(default)]
    pub openai_response: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Primary key of a `learn_requests` row.
///
/// The storage layer may use either a UUID or a bigint identity column, so
/// the id is kept in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LearnRequestId(String);

impl LearnRequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LearnRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LearnRequestId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LearnRequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ignores_extra_fields() {
        let json = r#"{
            "id": "7b1c1a0e-4a8f-4a5e-9a55-2d1f1a6c2b10",
            "aud": "authenticated",
            "role": "authenticated",
            "email": "ada@example.com",
            "app_metadata": {"provider": "email"}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(
            user.id,
            Uuid::parse_str("7b1c1a0e-4a8f-4a5e-9a55-2d1f1a6c2b10").unwrap()
        );
    }

    #[test]
    fn test_user_without_email() {
        let user: User =
            serde_json::from_str(r#"{"id": "7b1c1a0e-4a8f-4a5e-9a55-2d1f1a6c2b10"}"#).unwrap();
        assert!(user.email.is_none());
    }

    #[test]
    fn test_new_learn_request_has_two_columns() {
        let row = NewLearnRequest::new(Uuid::nil(), "Explain quantum computing");
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["input_text"], "Explain quantum computing");
    }

    #[test]
    fn test_learn_request_id_from_uuid_or_bigint() {
        let row: LearnRequest = serde_json::from_str(
            r#"{"id": 42, "user_id": "7b1c1a0e-4a8f-4a5e-9a55-2d1f1a6c2b10", "input_text": "q"}"#,
        )
        .unwrap();
        assert_eq!(row.id.as_str(), "42");
        assert!(row.openai_response.is_none());

        let row: LearnRequest = serde_json::from_str(
            r#"{"id": "0d9e5f0c-1111-4222-8333-944455556666", "user_id": "7b1c1a0e-4a8f-4a5e-9a55-2d1f1a6c2b10", "input_text": "q", "openai_response": null, "created_at": "2024-05-01T12:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(row.id.to_string(), "0d9e5f0c-1111-4222-8333-944455556666");
        assert!(row.created_at.is_some());
    }
}
