use crate::constants::DEFAULT_REMINDER_MESSAGE;
use crate::core::errors::DivvyError;
use crate::tests::{create_test_service, group_with_members};
use chrono::{Duration, Utc};

#[tokio::test]
async fn due_date_must_be_strictly_future() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;

    // A due date captured "now" is already in the past by the time it is
    // validated; one second out is comfortably accepted.
    let rejected = service
        .create_reminder(&group.id, &users[0], Utc::now(), None, None)
        .await;
    assert!(matches!(rejected, Err(DivvyError::PastDueDate)));

    let accepted = service
        .create_reminder(&group.id, &users[0], Utc::now() + Duration::seconds(1), None, None)
        .await;
    assert!(accepted.is_ok());
}

#[tokio::test]
async fn blank_messages_fall_back_to_the_default() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;
    let due = Utc::now() + Duration::days(3);

    let defaulted = service
        .create_reminder(&group.id, &users[0], due, None, None)
        .await
        .unwrap();
    assert_eq!(defaulted.message, DEFAULT_REMINDER_MESSAGE);

    let blank = service
        .create_reminder(&group.id, &users[0], due, Some("   ".to_string()), None)
        .await
        .unwrap();
    assert_eq!(blank.message, DEFAULT_REMINDER_MESSAGE);
}

#[tokio::test]
async fn target_must_be_a_member() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;

    let result = service
        .create_reminder(
            &group.id,
            &users[0],
            Utc::now() + Duration::days(1),
            None,
            Some("stranger".to_string()),
        )
        .await;

    assert!(matches!(result, Err(DivvyError::NotGroupMember(_))));
}

#[tokio::test]
async fn dispatch_reaches_the_whole_group_and_marks_sent() {
    let service = create_test_service();
    let (group, users) = group_with_members(
        &service,
        &[
            ("Alice", "alice@example.com"),
            ("Bob", "bob@example.com"),
            ("Cara", "cara@example.com"),
        ],
    )
    .await;
    let reminder = service
        .create_reminder(&group.id, &users[0], Utc::now() + Duration::days(1), None, None)
        .await
        .unwrap();

    let delivered = service.dispatch_reminder(&reminder.id, &users[0]).await.unwrap();
    assert_eq!(delivered, 3);

    let reminders = service.group_reminders(&group.id, &users[0]).await.unwrap();
    assert!(reminders[0].sent);
    assert!(reminders[0].sent_at.is_some());
}

#[tokio::test]
async fn dispatch_targets_a_single_member_when_set() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com"), ("Bob", "bob@example.com")])
        .await;
    let reminder = service
        .create_reminder(
            &group.id,
            &users[0],
            Utc::now() + Duration::days(1),
            Some("Rent is due".to_string()),
            Some(users[1].id.clone()),
        )
        .await
        .unwrap();

    let delivered = service.dispatch_reminder(&reminder.id, &users[0]).await.unwrap();

    assert_eq!(delivered, 1);
}

#[tokio::test]
async fn repeated_dispatch_resends() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;
    let reminder = service
        .create_reminder(&group.id, &users[0], Utc::now() + Duration::days(1), None, None)
        .await
        .unwrap();

    assert_eq!(service.dispatch_reminder(&reminder.id, &users[0]).await.unwrap(), 1);
    assert_eq!(service.dispatch_reminder(&reminder.id, &users[0]).await.unwrap(), 1);
}

#[tokio::test]
async fn ad_hoc_notice_respects_target() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com"), ("Bob", "bob@example.com")])
        .await;

    let everyone = service
        .send_group_notice(&group.id, None, None, &users[0])
        .await
        .unwrap();
    assert_eq!(everyone, 2);

    let just_bob = service
        .send_group_notice(&group.id, Some(&users[1].id), None, &users[0])
        .await
        .unwrap();
    assert_eq!(just_bob, 1);
}

#[tokio::test]
async fn reminders_list_soonest_due_first() {
    let service = create_test_service();
    let (group, users) = group_with_members(&service, &[("Alice", "alice@example.com")]).await;

    service
        .create_reminder(
            &group.id,
            &users[0],
            Utc::now() + Duration::days(7),
            Some("Later".to_string()),
            None,
        )
        .await
        .unwrap();
    service
        .create_reminder(
            &group.id,
            &users[0],
            Utc::now() + Duration::days(1),
            Some("Sooner".to_string()),
            None,
        )
        .await
        .unwrap();

    let reminders = service.group_reminders(&group.id, &users[0]).await.unwrap();

    assert_eq!(reminders[0].message, "Sooner");
    assert_eq!(reminders[1].message, "Later");
}
