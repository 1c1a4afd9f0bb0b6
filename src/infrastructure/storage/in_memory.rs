use crate::core::errors::DivvyError;
use crate::core::models::{Expense, Group, GroupAudit, Reminder, Settlement, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
    users_by_email: Arc<RwLock<HashMap<String, String>>>, // email -> user_id
    groups: Arc<RwLock<HashMap<String, Group>>>,
    groups_by_code: Arc<RwLock<HashMap<String, String>>>, // code -> group_id
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
    settlements: Arc<RwLock<HashMap<String, Settlement>>>,
    reminders: Arc<RwLock<HashMap<String, Reminder>>>,
    group_audits: Arc<RwLock<HashMap<String, Vec<GroupAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_user(&self, user: User) -> Result<(), DivvyError> {
        let mut by_email = self.users_by_email.write().await;
        if let Some(existing_id) = by_email.get(&user.email) {
            if *existing_id != user.id {
                return Err(DivvyError::EmailAlreadyRegistered(user.email));
            }
        }
        by_email.insert(user.email.clone(), user.id.clone());
        self.users.write().await.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DivvyError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DivvyError> {
        // For production: use a database index on email
        let user_id = self.users_by_email.read().await.get(email).cloned();
        Ok(match user_id {
            Some(id) => self.users.read().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn save_group(&self, group: Group) -> Result<(), DivvyError> {
        self.groups_by_code
            .write()
            .await
            .insert(group.code.clone(), group.id.clone());
        self.groups.write().await.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, DivvyError> {
        Ok(self.groups.read().await.get(group_id).cloned())
    }

    async fn get_group_by_code(&self, code: &str) -> Result<Option<Group>, DivvyError> {
        // For production: use a database index on code
        let group_id = self.groups_by_code.read().await.get(code).cloned();
        Ok(match group_id {
            Some(id) => self.groups.read().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn code_exists(&self, code: &str) -> Result<bool, DivvyError> {
        Ok(self.groups_by_code.read().await.contains_key(code))
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, DivvyError> {
        let mut groups: Vec<Group> = self
            .groups
            .read()
            .await
            .values()
            .filter(|g| g.is_member(user_id))
            .cloned()
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    async fn is_group_member(&self, group_id: &str, user_id: &str) -> Result<bool, DivvyError> {
        Ok(self
            .groups
            .read()
            .await
            .get(group_id)
            .map(|g| g.is_member(user_id))
            .unwrap_or(false))
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), DivvyError> {
        self.expenses.write().await.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, DivvyError> {
        Ok(self.expenses.read().await.get(expense_id).cloned())
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<(), DivvyError> {
        self.expenses.write().await.remove(expense_id);
        Ok(())
    }

    async fn get_expenses_by_group(&self, group_id: &str) -> Result<Vec<Expense>, DivvyError> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .read()
            .await
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), DivvyError> {
        self.settlements
            .write()
            .await
            .insert(settlement.id.clone(), settlement);
        Ok(())
    }

    async fn get_settlements_by_group(&self, group_id: &str) -> Result<Vec<Settlement>, DivvyError> {
        let mut settlements: Vec<Settlement> = self
            .settlements
            .read()
            .await
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        settlements.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(settlements)
    }

    async fn save_reminder(&self, reminder: Reminder) -> Result<(), DivvyError> {
        self.reminders
            .write()
            .await
            .insert(reminder.id.clone(), reminder);
        Ok(())
    }

    async fn get_reminder(&self, reminder_id: &str) -> Result<Option<Reminder>, DivvyError> {
        Ok(self.reminders.read().await.get(reminder_id).cloned())
    }

    async fn get_reminders_by_group(&self, group_id: &str) -> Result<Vec<Reminder>, DivvyError> {
        let mut reminders: Vec<Reminder> = self
            .reminders
            .read()
            .await
            .values()
            .filter(|r| r.group_id == group_id)
            .cloned()
            .collect();
        reminders.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(reminders)
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), DivvyError> {
        self.group_audits
            .write()
            .await
            .entry(audit.group_id.clone())
            .or_default()
            .push(audit);
        Ok(())
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, DivvyError> {
        // For production: add pagination
        Ok(self
            .group_audits
            .read()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}
