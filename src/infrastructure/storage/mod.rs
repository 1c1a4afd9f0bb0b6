use crate::core::errors::DivvyError;
use crate::core::models::{Expense, Group, GroupAudit, Reminder, Settlement, User};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_user(&self, user: User) -> Result<(), DivvyError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DivvyError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DivvyError>;

    async fn save_group(&self, group: Group) -> Result<(), DivvyError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, DivvyError>;
    async fn get_group_by_code(&self, code: &str) -> Result<Option<Group>, DivvyError>;
    async fn code_exists(&self, code: &str) -> Result<bool, DivvyError>;
    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, DivvyError>;
    async fn is_group_member(&self, group_id: &str, user_id: &str) -> Result<bool, DivvyError>;

    async fn save_expense(&self, expense: Expense) -> Result<(), DivvyError>;
    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, DivvyError>;
    async fn delete_expense(&self, expense_id: &str) -> Result<(), DivvyError>;
    async fn get_expenses_by_group(&self, group_id: &str) -> Result<Vec<Expense>, DivvyError>;

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), DivvyError>;
    async fn get_settlements_by_group(&self, group_id: &str) -> Result<Vec<Settlement>, DivvyError>;

    async fn save_reminder(&self, reminder: Reminder) -> Result<(), DivvyError>;
    async fn get_reminder(&self, reminder_id: &str) -> Result<Option<Reminder>, DivvyError>;
    async fn get_reminders_by_group(&self, group_id: &str) -> Result<Vec<Reminder>, DivvyError>;

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), DivvyError>;
    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, DivvyError>;
}

pub mod in_memory;
