use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Bcrypt hash, never a plaintext password.
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}
