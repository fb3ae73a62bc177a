use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::User;

// Inbound shapes stay loose (any JSON value, every field optional) so that a
// missing or mistyped field reaches the validator instead of failing inside
// the extractor.

/// Request body for `POST /user`.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpBody {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

/// Query string for `GET /user`.
#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `PATCH /user/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserBody {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "explicit")]
    pub image: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only an absent key is `None`.
fn explicit<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Public part of the user returned by sign-up and sign-in.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Full profile returned after an update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
