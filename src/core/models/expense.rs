use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A cost paid by one member, split equally across all current members of
/// the owning group when balances are computed.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub amount: f64,
    pub payer_id: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
