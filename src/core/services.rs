use crate::auth::jwt::{Claims, JwtService};
use crate::config::CONFIG;
use crate::constants::{
    BALANCES_QUERIED, DEFAULT_REMINDER_MESSAGE, EXPENSE_ADDED, EXPENSE_DELETED, GROUP_CREATED,
    JOIN_CODE_ALPHABET, JOIN_CODE_LENGTH, MAX_AMOUNT, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH,
    MAX_TITLE_LENGTH, MEMBER_JOINED, REMINDER_CREATED, REMINDER_DISPATCHED, SETTLEMENT_RECORDED,
    USER_REGISTERED,
};
use crate::core::balance::{self, MemberBalance, SettlementSuggestion};
use crate::core::errors::{DivvyError, FieldError};
use crate::core::models::{AppLog, Expense, Group, GroupAudit, Reminder, Settlement, User};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::notify::{Notifier, Recipient};
use crate::infrastructure::realtime::{GroupEvent, Realtime};
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct GroupBalances {
    balances: Vec<MemberBalance>,
    suggested_settlements: Vec<SettlementSuggestion>,
}

impl GroupBalances {
    pub fn balances(&self) -> &Vec<MemberBalance> {
        &self.balances
    }

    pub fn suggested_settlements(&self) -> &Vec<SettlementSuggestion> {
        &self.suggested_settlements
    }
}

pub struct DivvyService<L: LoggingService, S: Storage, R: Realtime> {
    storage: S,
    logging: L,
    realtime: R,
    notifiers: Vec<Box<dyn Notifier>>,
    jwt_service: JwtService,
}

impl<L: LoggingService, S: Storage, R: Realtime> DivvyService<L, S, R> {
    pub fn new(
        storage: S,
        logging: L,
        realtime: R,
        notifiers: Vec<Box<dyn Notifier>>,
        jwt_secret: String,
    ) -> Self {
        DivvyService {
            storage,
            logging,
            realtime,
            notifiers,
            jwt_service: JwtService::new(jwt_secret),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, DivvyError> {
        self.jwt_service.validate_token(token)
    }

    pub fn issue_token(&self, user_id: &str) -> Result<String, DivvyError> {
        self.jwt_service.generate_token(user_id)
    }

    // VALIDATION HELPERS

    async fn require_group(&self, group_id: &str) -> Result<Group, DivvyError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| DivvyError::GroupNotFound(group_id.to_string()))
    }

    async fn require_membership(&self, group_id: &str, user_id: &str) -> Result<Group, DivvyError> {
        let group = self.require_group(group_id).await?;
        if !group.is_member(user_id) {
            return Err(DivvyError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), DivvyError> {
        if value.trim().is_empty() {
            return Err(DivvyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.len() > max_length {
            return Err(DivvyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), DivvyError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DivvyError::InvalidAmount);
        }
        if amount > MAX_AMOUNT {
            return Err(DivvyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: format!("Amount cannot exceed {}", MAX_AMOUNT),
                },
            ));
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), DivvyError> {
        if email.is_empty() {
            return Err(DivvyError::MissingEmail);
        }
        if !email.contains('@') || !email.contains('.') || email.len() < 5 {
            return Err(DivvyError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), DivvyError> {
        self.logging.log_action(action, log_details.clone(), user_id).await?;
        if let Some(gid) = group_id {
            self.storage
                .save_group_audit(GroupAudit {
                    id: Uuid::new_v4().to_string(),
                    group_id: gid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    // USERS & IDENTITY

    pub async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
        phone: Option<String>,
    ) -> Result<User, DivvyError> {
        let email = email.to_lowercase();
        self.validate_email(&email)?;
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        if password.is_empty() {
            return Err(DivvyError::InvalidInput(
                "password".to_string(),
                FieldError {
                    field: "password".to_string(),
                    title: "Invalid password".to_string(),
                    description: "Password cannot be empty".to_string(),
                },
            ));
        }
        if self.storage.get_user_by_email(&email).await?.is_some() {
            return Err(DivvyError::EmailAlreadyRegistered(email));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            password: bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                .map_err(|e| DivvyError::InternalServerError(format!("Password hashing error: {}", e)))?,
            created_at: Utc::now(),
        };
        self.storage.save_user(user.clone()).await?;

        self.log_and_audit(
            None,
            USER_REGISTERED,
            json!({ "user_id": user.id, "email": user.email }),
            Some(user.id.as_str()),
        )
        .await?;

        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), DivvyError> {
        let user = self
            .storage
            .get_user_by_email(&email.to_lowercase())
            .await?
            .ok_or(DivvyError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, &user.password)
            .map_err(|e| DivvyError::InternalServerError(format!("Password verification error: {}", e)))?;
        if !matches {
            return Err(DivvyError::InvalidCredentials);
        }

        let token = self.jwt_service.generate_token(&user.id)?;
        Ok((user, token))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, DivvyError> {
        self.storage.get_user(user_id).await
    }

    /// Group create/join flows take a name and email and get back an
    /// account, existing or fresh. Accounts minted here carry a random
    /// placeholder credential; a real password arrives via registration.
    pub async fn find_or_create_member(
        &self,
        name: &str,
        email: &str,
        phone: Option<String>,
    ) -> Result<User, DivvyError> {
        let email = email.to_lowercase();
        self.validate_email(&email)?;

        if let Some(mut user) = self.storage.get_user_by_email(&email).await? {
            if let Some(phone) = phone {
                user.phone = Some(phone);
                self.storage.save_user(user.clone()).await?;
            }
            return Ok(user);
        }

        self.validate_string_input("name", name, MAX_NAME_LENGTH)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email,
            phone,
            password: bcrypt::hash(Uuid::new_v4().to_string(), bcrypt::DEFAULT_COST)
                .map_err(|e| DivvyError::InternalServerError(format!("Password hashing error: {}", e)))?,
            created_at: Utc::now(),
        };
        self.storage.save_user(user.clone()).await?;

        self.log_and_audit(
            None,
            USER_REGISTERED,
            json!({ "user_id": user.id, "email": user.email }),
            Some(user.id.as_str()),
        )
        .await?;

        Ok(user)
    }

    // GROUPS

    pub async fn create_group(&self, name: String, created_by: &User) -> Result<Group, DivvyError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;

        let code = self.generate_join_code().await?;
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            code,
            currency: CONFIG.default_currency.clone(),
            member_ids: vec![created_by.id.clone()],
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;
        info!(group_id = %group.id, code = %group.code, "group created");

        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "code": group.code }),
            Some(created_by.id.as_str()),
        )
        .await?;

        Ok(group)
    }

    /// Collisions are resolved by regenerating until the code is unused;
    /// never surfaced to the caller.
    async fn generate_join_code(&self) -> Result<String, DivvyError> {
        loop {
            let code: String = {
                let mut rng = rand::rng();
                (0..JOIN_CODE_LENGTH)
                    .map(|_| JOIN_CODE_ALPHABET[rng.random_range(0..JOIN_CODE_ALPHABET.len())] as char)
                    .collect()
            };
            if !self.storage.code_exists(&code).await? {
                return Ok(code);
            }
        }
    }

    /// Joining is idempotent for existing members: the group comes back
    /// unchanged and no event is broadcast.
    pub async fn join_group_by_code(&self, code: &str, user: &User) -> Result<Group, DivvyError> {
        let normalized = code.trim().to_uppercase();
        let mut group = self
            .storage
            .get_group_by_code(&normalized)
            .await?
            .ok_or_else(|| DivvyError::JoinCodeNotFound(normalized.clone()))?;

        if group.is_member(&user.id) {
            return Ok(group);
        }

        group.member_ids.push(user.id.clone());
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(&group.id),
            MEMBER_JOINED,
            json!({ "group_id": group.id, "user_id": user.id, "code": normalized }),
            Some(user.id.as_str()),
        )
        .await?;
        self.realtime.broadcast(&group.id, GroupEvent::MemberJoined).await?;

        Ok(group)
    }

    pub async fn group_details(&self, group_id: &str, acting: &User) -> Result<Group, DivvyError> {
        self.require_membership(group_id, &acting.id).await
    }

    pub async fn user_groups(&self, user: &User) -> Result<Vec<Group>, DivvyError> {
        self.storage.get_user_groups(&user.id).await
    }

    // EXPENSES

    pub async fn add_expense(
        &self,
        group_id: &str,
        title: String,
        amount: f64,
        payer_id: &str,
        date: Option<DateTime<Utc>>,
        added_by: &User,
    ) -> Result<Expense, DivvyError> {
        let group = self.require_membership(group_id, &added_by.id).await?;
        if !group.is_member(payer_id) {
            return Err(DivvyError::NotGroupMember(payer_id.to_string()));
        }
        self.validate_string_input("title", &title, MAX_TITLE_LENGTH)?;
        self.validate_amount_input("amount", amount)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            title,
            amount,
            payer_id: payer_id.to_string(),
            date: date.unwrap_or_else(Utc::now),
            created_at: Utc::now(),
        };
        self.storage.save_expense(expense.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "group_id": group_id,
                "title": expense.title,
                "amount": expense.amount,
                "payer_id": expense.payer_id
            }),
            Some(added_by.id.as_str()),
        )
        .await?;
        self.realtime.broadcast(group_id, GroupEvent::ExpenseAdded).await?;

        Ok(expense)
    }

    /// Deletion is payer-only and cascades to nothing: settlements and
    /// reminders referencing the group are untouched.
    pub async fn delete_expense(&self, expense_id: &str, acting: &User) -> Result<(), DivvyError> {
        let expense = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| DivvyError::ExpenseNotFound(expense_id.to_string()))?;
        if expense.payer_id != acting.id {
            return Err(DivvyError::NotExpensePayer(expense_id.to_string()));
        }

        self.storage.delete_expense(expense_id).await?;

        self.log_and_audit(
            Some(&expense.group_id),
            EXPENSE_DELETED,
            json!({ "expense_id": expense_id, "group_id": expense.group_id }),
            Some(acting.id.as_str()),
        )
        .await?;
        self.realtime
            .broadcast(&expense.group_id, GroupEvent::ExpenseDeleted)
            .await?;

        Ok(())
    }

    pub async fn group_expenses(&self, group_id: &str, acting: &User) -> Result<Vec<Expense>, DivvyError> {
        self.require_membership(group_id, &acting.id).await?;
        self.storage.get_expenses_by_group(group_id).await
    }

    // SETTLEMENTS

    /// Appends a settlement record. Balances stay derived: nothing is
    /// recomputed or cached here, so the write cannot drift from the
    /// expense/settlement history it offsets.
    pub async fn record_settlement(
        &self,
        group_id: &str,
        from_user_id: &str,
        to_user_id: &str,
        amount: f64,
        recorded_by: &User,
    ) -> Result<Settlement, DivvyError> {
        let group = self.require_membership(group_id, &recorded_by.id).await?;

        if from_user_id == to_user_id {
            return Err(DivvyError::SelfSettlement);
        }
        if !group.is_member(from_user_id) {
            return Err(DivvyError::NotGroupMember(from_user_id.to_string()));
        }
        if !group.is_member(to_user_id) {
            return Err(DivvyError::NotGroupMember(to_user_id.to_string()));
        }
        self.validate_amount_input("amount", amount)?;

        let settlement = Settlement {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            from_user_id: from_user_id.to_string(),
            to_user_id: to_user_id.to_string(),
            amount,
            date: Utc::now(),
        };
        self.storage.save_settlement(settlement.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            SETTLEMENT_RECORDED,
            json!({
                "settlement_id": settlement.id,
                "group_id": group_id,
                "from_user_id": from_user_id,
                "to_user_id": to_user_id,
                "amount": amount
            }),
            Some(recorded_by.id.as_str()),
        )
        .await?;

        Ok(settlement)
    }

    pub async fn group_settlements(&self, group_id: &str, acting: &User) -> Result<Vec<Settlement>, DivvyError> {
        self.require_membership(group_id, &acting.id).await?;
        self.storage.get_settlements_by_group(group_id).await
    }

    // BALANCES

    /// Always derived fresh from the full expense and settlement history;
    /// O(expenses + settlements) per call, which is fine at this scale.
    pub async fn group_balances(&self, group_id: &str, acting: &User) -> Result<GroupBalances, DivvyError> {
        let group = self.require_membership(group_id, &acting.id).await?;
        let expenses = self.storage.get_expenses_by_group(group_id).await?;
        let settlements = self.storage.get_settlements_by_group(group_id).await?;

        let raw = balance::compute_balances(&group.member_ids, &expenses, &settlements);
        let response = GroupBalances {
            balances: balance::display_balances(&raw),
            suggested_settlements: balance::suggest_settlements(&raw),
        };

        self.log_and_audit(
            Some(group_id),
            BALANCES_QUERIED,
            json!({ "group_id": group_id, "user_id": acting.id }),
            Some(acting.id.as_str()),
        )
        .await?;

        Ok(response)
    }

    // REMINDERS

    pub async fn create_reminder(
        &self,
        group_id: &str,
        created_by: &User,
        due_date: DateTime<Utc>,
        message: Option<String>,
        for_user: Option<String>,
    ) -> Result<Reminder, DivvyError> {
        let group = self.require_membership(group_id, &created_by.id).await?;
        if let Some(ref target) = for_user {
            if !group.is_member(target) {
                return Err(DivvyError::NotGroupMember(target.clone()));
            }
        }
        if due_date <= Utc::now() {
            return Err(DivvyError::PastDueDate);
        }

        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_REMINDER_MESSAGE.to_string());
        self.validate_string_input("message", &message, MAX_MESSAGE_LENGTH)?;

        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            created_by: created_by.id.clone(),
            for_user,
            due_date,
            message,
            sent: false,
            sent_at: None,
            created_at: Utc::now(),
        };
        self.storage.save_reminder(reminder.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            REMINDER_CREATED,
            json!({
                "reminder_id": reminder.id,
                "group_id": group_id,
                "due_date": reminder.due_date,
                "for_user": reminder.for_user
            }),
            Some(created_by.id.as_str()),
        )
        .await?;

        Ok(reminder)
    }

    pub async fn group_reminders(&self, group_id: &str, acting: &User) -> Result<Vec<Reminder>, DivvyError> {
        self.require_membership(group_id, &acting.id).await?;
        self.storage.get_reminders_by_group(group_id).await
    }

    /// Sends a stored reminder to its audience and marks it sent.
    /// Repeated dispatch simply resends; there is no dedup.
    pub async fn dispatch_reminder(&self, reminder_id: &str, sent_by: &User) -> Result<usize, DivvyError> {
        let mut reminder = self
            .storage
            .get_reminder(reminder_id)
            .await?
            .ok_or_else(|| DivvyError::ReminderNotFound(reminder_id.to_string()))?;
        let group = self.require_membership(&reminder.group_id, &sent_by.id).await?;

        let delivered = self
            .notify_group(&group, reminder.for_user.as_deref(), &reminder.message)
            .await?;

        reminder.sent = true;
        reminder.sent_at = Some(Utc::now());
        self.storage.save_reminder(reminder.clone()).await?;

        self.log_and_audit(
            Some(&group.id),
            REMINDER_DISPATCHED,
            json!({ "reminder_id": reminder.id, "group_id": group.id, "delivered": delivered }),
            Some(sent_by.id.as_str()),
        )
        .await?;

        Ok(delivered)
    }

    /// Ad-hoc "settle up" notice without a stored reminder, same audience
    /// rules as dispatch.
    pub async fn send_group_notice(
        &self,
        group_id: &str,
        target_member_id: Option<&str>,
        message: Option<String>,
        sent_by: &User,
    ) -> Result<usize, DivvyError> {
        let group = self.require_membership(group_id, &sent_by.id).await?;
        if let Some(target) = target_member_id {
            if !group.is_member(target) {
                return Err(DivvyError::NotGroupMember(target.to_string()));
            }
        }

        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_REMINDER_MESSAGE.to_string());

        let delivered = self.notify_group(&group, target_member_id, &message).await?;

        self.log_and_audit(
            Some(group_id),
            REMINDER_DISPATCHED,
            json!({ "group_id": group_id, "target": target_member_id, "delivered": delivered }),
            Some(sent_by.id.as_str()),
        )
        .await?;

        Ok(delivered)
    }

    /// Resolves the audience (one targeted member or the whole group) and
    /// fans the message out over every configured channel.
    async fn notify_group(
        &self,
        group: &Group,
        target_member_id: Option<&str>,
        message: &str,
    ) -> Result<usize, DivvyError> {
        let audience_ids: Vec<&String> = match target_member_id {
            Some(target) => group.member_ids.iter().filter(|id| *id == target).collect(),
            None => group.member_ids.iter().collect(),
        };

        let mut recipients = Vec::with_capacity(audience_ids.len());
        for member_id in audience_ids {
            let user = self
                .storage
                .get_user(member_id)
                .await?
                .ok_or_else(|| DivvyError::UserNotFound(member_id.clone()))?;
            recipients.push(Recipient::from(&user));
        }

        let subject = format!("Reminder: {} – settle up", group.name);
        let mut delivered = 0;
        for notifier in &self.notifiers {
            delivered += notifier.notify(&recipients, &subject, message).await?;
        }
        Ok(delivered)
    }

    // REALTIME

    pub async fn subscribe(&self, group_id: &str) -> tokio::sync::broadcast::Receiver<GroupEvent> {
        self.realtime.subscribe(group_id).await
    }

    // AUDIT SURFACE

    pub async fn app_logs(&self) -> Result<Vec<AppLog>, DivvyError> {
        self.logging.get_logs().await
    }

    pub async fn group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, DivvyError> {
        self.require_group(group_id).await?;
        self.storage.get_group_audits(group_id).await
    }
}
