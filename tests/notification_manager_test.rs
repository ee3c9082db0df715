mod common;

use chrono::Duration;
use common::TestLibrary;
use library_lending::application::{lending, notification};
use library_lending::domain::{Fine, ItemKind, LoanId};
use library_lending::ports::*;
use rust_decimal_macros::dec;

// ============================================================================
// send_overdue_reminders
// ============================================================================

#[tokio::test]
async fn test_overdue_reminders_one_per_track() {
    // Arrange: 書籍とCDを1件ずつ延滞している利用者
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    let cd = library.add_item(ItemKind::Cd, "Kind of Blue").await;
    library.add_loan_due_in(&user, &book, Duration::days(-3)).await;
    library.add_loan_due_in(&user, &cd, Duration::days(-1)).await;

    // Act
    let sent = notification::send_overdue_reminders(&library.deps).await;

    // Assert: 種別ごとに1通ずつ
    assert_eq!(sent, 2);
    let emails = library.notifier.sent_to("kamal@test.com");
    assert_eq!(emails.len(), 2);
    assert!(emails.iter().any(|e| e.subject.contains("Overdue Books")));
    assert!(emails.iter().any(|e| e.subject.contains("Overdue CDs")));
}

#[tokio::test]
async fn test_overdue_reminders_include_outstanding_balance() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let cd = library.add_item(ItemKind::Cd, "Kind of Blue").await;
    let loan = library.add_loan_due_in(&user, &cd, Duration::days(-2)).await;

    let mut fine = Fine::new(
        user.id.clone().unwrap(),
        loan.id.clone().unwrap(),
        ItemKind::Cd,
        dec!(40),
        library.now(),
    )
    .unwrap();
    library.deps.fines.save(&mut fine).await.unwrap();

    let sent = notification::send_overdue_reminders(&library.deps).await;

    assert_eq!(sent, 1);
    let emails = library.notifier.sent();
    assert!(emails[0].body.contains("1 overdue CD loan(s)"));
    assert!(emails[0].body.contains("40.00 NIS"));
}

#[tokio::test]
async fn test_overdue_reminders_skip_inactive_and_unknown_users() {
    let library = TestLibrary::new().await;
    let mut inactive = library.add_user("Sleeper", "sleeper@test.com").await;
    inactive.active = false;
    library.deps.users.save(&mut inactive).await.unwrap();

    let book = library.add_item(ItemKind::Book, "Dune").await;
    library.add_loan_due_in(&inactive, &book, Duration::days(-5)).await;

    // 削除済みの利用者の貸出
    let ghost = library.add_user("Ghost", "ghost@test.com").await;
    let other = library.add_item(ItemKind::Book, "Emma").await;
    library.add_loan_due_in(&ghost, &other, Duration::days(-5)).await;
    library
        .deps
        .users
        .delete(ghost.id.as_ref().unwrap())
        .await
        .unwrap();

    let sent = notification::send_overdue_reminders(&library.deps).await;

    assert_eq!(sent, 0);
    assert!(library.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_overdue_reminders_count_only_successful_sends() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    library.add_loan_due_in(&user, &book, Duration::days(-3)).await;

    library.notifier.set_failing(true);

    assert_eq!(notification::send_overdue_reminders(&library.deps).await, 0);
}

#[tokio::test]
async fn test_returned_loans_are_not_reminded() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    let mut loan = library.add_loan_due_in(&user, &book, Duration::days(-3)).await;

    loan.mark_returned();
    library.deps.loans.update(&loan).await.unwrap();

    assert_eq!(notification::send_overdue_reminders(&library.deps).await, 0);
}

// ============================================================================
// send_combined_reminders
// ============================================================================

#[tokio::test]
async fn test_combined_reminder_one_per_user() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    let cd = library.add_item(ItemKind::Cd, "Kind of Blue").await;
    library.add_loan_due_in(&user, &book, Duration::days(-3)).await;
    library.add_loan_due_in(&user, &cd, Duration::days(-1)).await;

    let sent = notification::send_combined_reminders(&library.deps).await;

    assert_eq!(sent, 1);
    let email = &library.notifier.sent()[0];
    assert_eq!(email.subject, "Library Account Reminder");
    assert!(email.body.contains("Overdue books: 1"));
    assert!(email.body.contains("Overdue CDs: 1"));
}

#[tokio::test]
async fn test_combined_reminder_for_unpaid_fine_only() {
    let library = TestLibrary::new().await;
    let fined = library.add_user("Kamal", "kamal@test.com").await;
    library.add_user("Clean", "clean@test.com").await;

    // 返却済みだが延滞料金が残っている
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    let loan = library.add_loan_due_in(&fined, &book, Duration::days(-2)).await;
    let outcome = lending::return_item(&library.deps, ItemKind::Book, loan.id.as_ref().unwrap())
        .await
        .unwrap();
    assert!(outcome.fine.is_some());
    library.notifier.clear();

    let sent = notification::send_combined_reminders(&library.deps).await;

    assert_eq!(sent, 1);
    let email = &library.notifier.sent()[0];
    assert_eq!(email.to, "kamal@test.com");
    assert!(email.body.contains("Unpaid book fines: 1 (20.00 NIS)"));
}

#[tokio::test]
async fn test_combined_reminder_for_unflagged_fine_without_balance() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;

    let mut fine = Fine::new(
        user.id.clone().unwrap(),
        LoanId::new("CDLOAN_1_1"),
        ItemKind::Cd,
        dec!(20),
        library.now(),
    )
    .unwrap();
    fine.set_paid_amount(dec!(20)).unwrap();
    library.deps.fines.save(&mut fine).await.unwrap();

    let sent = notification::send_combined_reminders(&library.deps).await;

    assert_eq!(sent, 1);
    assert!(
        library.notifier.sent()[0]
            .body
            .contains("Unpaid CD fines: 1 (0.00 NIS)")
    );
}

#[tokio::test]
async fn test_combined_reminder_skips_users_without_signals() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    library.add_loan_due_in(&user, &book, Duration::days(10)).await;

    assert_eq!(notification::send_combined_reminders(&library.deps).await, 0);
}

// ============================================================================
// send_return_reminders
// ============================================================================

#[tokio::test]
async fn test_return_reminder_for_loan_due_tomorrow() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    library.add_loan_due_in(&user, &book, Duration::days(1)).await;

    let sent = notification::send_return_reminders(&library.deps, 2).await;

    assert_eq!(sent, 1);
    assert_eq!(
        library.notifier.sent()[0].subject,
        "Return Reminder: Clean Code"
    );
}

#[tokio::test]
async fn test_return_reminder_ignores_far_and_overdue_loans() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let far = library.add_item(ItemKind::Book, "Far Away").await;
    let late = library.add_item(ItemKind::Book, "Too Late").await;
    library.add_loan_due_in(&user, &far, Duration::days(5)).await;
    library.add_loan_due_in(&user, &late, Duration::days(-1)).await;

    assert_eq!(notification::send_return_reminders(&library.deps, 2).await, 0);
}

#[tokio::test]
async fn test_return_reminder_covers_books_only() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let cd = library.add_item(ItemKind::Cd, "Kind of Blue").await;
    library.add_loan_due_in(&user, &cd, Duration::days(1)).await;

    assert_eq!(notification::send_return_reminders(&library.deps, 2).await, 0);
}

#[tokio::test]
async fn test_return_reminder_with_huge_horizon_reaches_every_open_loan() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;
    let book = library.add_item(ItemKind::Book, "Clean Code").await;
    library.add_loan_due_in(&user, &book, Duration::days(400)).await;

    let sent = notification::send_return_reminders(&library.deps, 200_000_000).await;

    assert_eq!(sent, 1);
}

// ============================================================================
// pass-throughs
// ============================================================================

#[tokio::test]
async fn test_test_email_configuration_forces_real_mode() {
    let library = TestLibrary::new().await;
    assert!(!library.notifier.is_real_mode());

    let sent = notification::test_email_configuration(&library.deps, "admin@test.com").await;

    assert!(sent);
    assert!(library.notifier.is_real_mode());
    assert_eq!(library.notifier.sent_to("admin@test.com").len(), 1);
}

#[tokio::test]
async fn test_welcome_and_payment_notifications() {
    let library = TestLibrary::new().await;
    let user = library.add_user("Kamal", "kamal@test.com").await;

    assert!(notification::send_welcome_notification(&library.deps, &user, Some("temp123")).await);
    assert!(
        notification::send_payment_notification(&library.deps, &user, dec!(20), dec!(5)).await
    );

    let emails = library.notifier.sent();
    assert_eq!(emails.len(), 2);
    assert!(emails[0].body.contains("temp123"));
    assert!(emails[1].body.contains("Remaining balance: 5.00 NIS"));

    library.notifier.set_failing(true);
    assert!(!notification::send_welcome_notification(&library.deps, &user, None).await);
}
