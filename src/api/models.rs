use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::DivvyError;
use crate::core::models::{Group, User};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub group_name: String,
    pub user_name: String,
    pub user_email: String,
    pub phone: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct JoinGroupRequest {
    pub code: String,
    pub user_name: String,
    pub user_email: String,
    pub phone: Option<String>,
}

/// Group create/join hand back the group, the resolved account, and a
/// bearer token for subsequent calls.
#[derive(Serialize, ToSchema)]
pub struct GroupSessionResponse {
    pub group: Group,
    pub user: User,
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExpenseRequest {
    pub group_id: String,
    pub title: String,
    pub amount: f64,
    pub payer_id: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordSettlementRequest {
    pub group_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateReminderRequest {
    pub group_id: String,
    pub due_date: DateTime<Utc>,
    pub message: Option<String>,
    pub for_user: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SendNoticeRequest {
    pub group_id: String,
    pub member_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct NoticeResponse {
    pub success: bool,
    pub sent: usize,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for DivvyError to implement IntoResponse
pub struct ApiError(pub DivvyError);

impl From<DivvyError> for ApiError {
    fn from(err: DivvyError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            DivvyError::MissingEmail
            | DivvyError::InvalidEmail(_)
            | DivvyError::InvalidAmount
            | DivvyError::SelfSettlement
            | DivvyError::PastDueDate
            | DivvyError::InvalidInput(_, _) => StatusCode::BAD_REQUEST,
            DivvyError::InvalidCredentials | DivvyError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DivvyError::NotGroupMember(_) | DivvyError::NotExpensePayer(_) => StatusCode::FORBIDDEN,
            DivvyError::UserNotFound(_)
            | DivvyError::GroupNotFound(_)
            | DivvyError::JoinCodeNotFound(_)
            | DivvyError::ExpenseNotFound(_)
            | DivvyError::ReminderNotFound(_) => StatusCode::NOT_FOUND,
            DivvyError::EmailAlreadyRegistered(_) => StatusCode::CONFLICT,
            DivvyError::StorageError(_)
            | DivvyError::LoggingError(_)
            | DivvyError::NotifyError(_)
            | DivvyError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
