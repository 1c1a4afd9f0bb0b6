use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A one-shot notification intent. Purely informational: reminders never
/// affect balances, and once created they are only ever marked sent.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Reminder {
    pub id: String,
    pub group_id: String,
    pub created_by: String,
    /// Absent means the whole group is the audience.
    pub for_user: Option<String>,
    pub due_date: DateTime<Utc>,
    pub message: String,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
