use crate::core::errors::DivvyError;
use crate::infrastructure::realtime::GroupEvent;
use crate::tests::{create_test_service, group_with_members, register};
use chrono::{Duration, Utc};

#[tokio::test]
async fn add_expense_records_payer_and_amount() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com"), ("Bob", "bob@example.com")])
        .await;

    let expense = service
        .add_expense(&group.id, "Dinner".to_string(), 100.0, &users[0].id, None, &users[1])
        .await
        .unwrap();

    assert_eq!(expense.payer_id, users[0].id);
    assert_eq!(expense.amount, 100.0);
    assert_eq!(expense.group_id, group.id);
}

#[tokio::test]
async fn expense_payer_must_be_a_member() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;
    let outsider = register(&service, "Eve", "eve@example.com").await;

    let result = service
        .add_expense(&group.id, "Dinner".to_string(), 40.0, &outsider.id, None, &users[0])
        .await;

    assert!(matches!(result, Err(DivvyError::NotGroupMember(_))));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;

    for amount in [0.0, -12.5] {
        let result = service
            .add_expense(&group.id, "Dinner".to_string(), amount, &users[0].id, None, &users[0])
            .await;
        assert!(matches!(result, Err(DivvyError::InvalidAmount)));
    }
}

#[tokio::test]
async fn only_the_payer_may_delete() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com"), ("Bob", "bob@example.com")])
        .await;
    let expense = service
        .add_expense(&group.id, "Taxi".to_string(), 30.0, &users[0].id, None, &users[0])
        .await
        .unwrap();

    let denied = service.delete_expense(&expense.id, &users[1]).await;
    assert!(matches!(denied, Err(DivvyError::NotExpensePayer(_))));

    service.delete_expense(&expense.id, &users[0]).await.unwrap();
    let remaining = service.group_expenses(&group.id, &users[0]).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn deleting_a_missing_expense_is_not_found() {
    let service = create_test_service();
    let (_, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;

    let result = service.delete_expense("missing", &users[0]).await;

    assert!(matches!(result, Err(DivvyError::ExpenseNotFound(_))));
}

#[tokio::test]
async fn expenses_list_newest_first() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;

    let older = Utc::now() - Duration::days(2);
    service
        .add_expense(&group.id, "Old".to_string(), 10.0, &users[0].id, Some(older), &users[0])
        .await
        .unwrap();
    service
        .add_expense(&group.id, "New".to_string(), 20.0, &users[0].id, None, &users[0])
        .await
        .unwrap();

    let expenses = service.group_expenses(&group.id, &users[0]).await.unwrap();

    assert_eq!(expenses[0].title, "New");
    assert_eq!(expenses[1].title, "Old");
}

#[tokio::test]
async fn mutations_broadcast_change_hints() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;
    let mut rx = service.subscribe(&group.id).await;

    let expense = service
        .add_expense(&group.id, "Dinner".to_string(), 60.0, &users[0].id, None, &users[0])
        .await
        .unwrap();
    service.delete_expense(&expense.id, &users[0]).await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), GroupEvent::ExpenseAdded);
    assert_eq!(rx.recv().await.unwrap(), GroupEvent::ExpenseDeleted);
}
