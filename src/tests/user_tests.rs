use crate::core::errors::DivvyError;
use crate::tests::{create_test_service, register};

#[tokio::test]
async fn register_then_login() {
    let service = create_test_service();
    let user = register(&service, "Alice", "Alice@Example.com").await;

    // Emails are stored lowercased.
    assert_eq!(user.email, "alice@example.com");

    let (logged_in, token) = service.login("alice@example.com", "password123").await.unwrap();
    assert_eq!(logged_in.id, user.id);

    let claims = service.validate_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let service = create_test_service();
    register(&service, "Alice", "alice@example.com").await;

    let result = service
        .register_user(
            "Other Alice".to_string(),
            "alice@example.com".to_string(),
            "hunter2".to_string(),
            None,
        )
        .await;

    assert!(matches!(result, Err(DivvyError::EmailAlreadyRegistered(_))));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let service = create_test_service();
    register(&service, "Alice", "alice@example.com").await;

    let result = service.login("alice@example.com", "wrong").await;

    assert!(matches!(result, Err(DivvyError::InvalidCredentials)));
}

#[tokio::test]
async fn malformed_emails_are_rejected() {
    let service = create_test_service();

    let result = service
        .register_user("Alice".to_string(), "invalid".to_string(), "pw".to_string(), None)
        .await;

    assert!(matches!(result, Err(DivvyError::InvalidEmail(_))));
}

#[tokio::test]
async fn find_or_create_reuses_existing_accounts() {
    let service = create_test_service();
    let existing = register(&service, "Alice", "alice@example.com").await;

    let found = service
        .find_or_create_member("Someone Else", "alice@example.com", Some("+15550100".to_string()))
        .await
        .unwrap();

    // Same account, phone backfilled, name untouched.
    assert_eq!(found.id, existing.id);
    assert_eq!(found.name, "Alice");
    assert_eq!(found.phone.as_deref(), Some("+15550100"));

    let fresh = service
        .find_or_create_member("Bob", "bob@example.com", None)
        .await
        .unwrap();
    assert_eq!(fresh.name, "Bob");

    // Placeholder credentials never match a login attempt.
    let login = service.login("bob@example.com", "password123").await;
    assert!(matches!(login, Err(DivvyError::InvalidCredentials)));
}
