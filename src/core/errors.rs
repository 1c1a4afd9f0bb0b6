use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum DivvyError {
    #[error("Email is required")]
    MissingEmail,
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Group {0} not found")]
    GroupNotFound(String),
    #[error("No group matches join code {0}")]
    JoinCodeNotFound(String),
    #[error("User {0} is not a group member")]
    NotGroupMember(String),
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),
    #[error("Only the payer may delete expense {0}")]
    NotExpensePayer(String),
    #[error("Cannot record a settlement to self")]
    SelfSettlement,
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Reminder {0} not found")]
    ReminderNotFound(String),
    #[error("Reminder due date must be in the future")]
    PastDueDate,
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Notification error: {0}")]
    NotifyError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
