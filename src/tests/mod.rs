mod balance_tests;
mod expense_tests;
mod reminder_tests;
mod user_tests;

use crate::api::AppService;
use crate::core::models::{Group, User};
use crate::core::services::DivvyService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::notify::{Notifier, email::EmailNotifier, sms::SmsNotifier};
use crate::infrastructure::realtime::in_memory::InMemoryBroadcast;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> AppService {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let realtime = InMemoryBroadcast::new();
    let notifiers: Vec<Box<dyn Notifier>> =
        vec![Box::new(EmailNotifier::from_config()), Box::new(SmsNotifier::new())];
    DivvyService::new(storage, logging, realtime, notifiers, "test-secret".to_string())
}

pub async fn register(service: &AppService, name: &str, email: &str) -> User {
    service
        .register_user(name.to_string(), email.to_string(), "password123".to_string(), None)
        .await
        .unwrap()
}

/// First member creates the group, the rest join through the code.
pub async fn group_with_members(service: &AppService, members: &[(&str, &str)]) -> (Group, Vec<User>) {
    let mut users = Vec::with_capacity(members.len());
    for (name, email) in members {
        users.push(register(service, name, email).await);
    }
    let group = service
        .create_group("Test Group".to_string(), &users[0])
        .await
        .unwrap();
    for user in &users[1..] {
        service.join_group_by_code(&group.code, user).await.unwrap();
    }
    let group = service.group_details(&group.id, &users[0]).await.unwrap();
    (group, users)
}
