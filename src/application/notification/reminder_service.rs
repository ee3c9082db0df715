//! 通知マネージャー
//!
//! 状態を持たず、呼び出しのたびにリポジトリから計算し直す。
//! 送信の失敗は致命的ではなく、成功した送信のみを数える。

use crate::domain::{Fine, ItemKind, Loan, ReminderSummary, User, UserId, notice};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

use crate::application::ServiceDependencies;

/// 通知対象として有効な利用者を取得する（存在しない・無効な利用者はスキップ）
async fn active_user(deps: &ServiceDependencies, user_id: &UserId) -> Option<User> {
    match deps.users.find_by_id(user_id).await {
        Some(user) if user.active => Some(user),
        Some(_) => {
            tracing::debug!("Skipping inactive user {}", user_id);
            None
        }
        None => {
            tracing::debug!("Skipping unknown user {}", user_id);
            None
        }
    }
}

fn outstanding_total(fines: &[Fine]) -> Decimal {
    fines
        .iter()
        .filter(|fine| fine.is_unpaid())
        .map(Fine::remaining_amount)
        .sum()
}

/// 延滞通知を送信する
///
/// 書籍・CDそれぞれの延滞貸出から対象利用者を集め、利用者ごとに
/// 延滞のある種別ごとに1通ずつ送信する。
///
/// # 戻り値
/// 送信に成功した通知の件数
pub async fn send_overdue_reminders(deps: &ServiceDependencies) -> usize {
    let now = deps.clock.now();

    // 1. 両トラックの延滞から対象利用者を集める（重複なし）
    let mut user_ids = BTreeSet::new();
    for kind in ItemKind::ALL {
        for loan in deps.loans.find_overdue(kind, now).await {
            user_ids.insert(loan.user_id);
        }
    }

    let mut sent = 0;
    for user_id in &user_ids {
        let Some(user) = active_user(deps, user_id).await else {
            continue;
        };

        // 2. 利用者ごとに貸出を取り直し、種別ごとに通知
        for kind in ItemKind::ALL {
            let overdue_count = deps
                .loans
                .find_by_user_id(kind, user_id)
                .await
                .iter()
                .filter(|loan| loan.is_overdue(now))
                .count();
            if overdue_count == 0 {
                continue;
            }

            let fines = deps.fines.find_by_user_id(kind, user_id).await;
            let outstanding = outstanding_total(&fines);

            if deps
                .notifier
                .send_overdue_reminder(&user, kind, overdue_count, outstanding)
                .await
            {
                sent += 1;
            } else {
                tracing::warn!("Overdue {} reminder to {} failed", kind.label(), user.email);
            }
        }
    }

    tracing::info!("Sent {} overdue reminder(s) to {} user(s)", sent, user_ids.len());
    sent
}

/// まとめ通知を送信する
///
/// 有効な利用者ごとに延滞（書籍・CD）と未払い延滞料金（書籍・CD）を集計し、
/// 1つでもあれば1通だけ送信する。
///
/// # 戻り値
/// 送信に成功した通知の件数（利用者あたり最大1）
pub async fn send_combined_reminders(deps: &ServiceDependencies) -> usize {
    let now = deps.clock.now();
    let mut sent = 0;

    for user in deps.users.find_all().await {
        let Some(user_id) = user.id.clone() else {
            continue;
        };
        if !user.active {
            tracing::debug!("Skipping inactive user {}", user_id);
            continue;
        }

        let summary = summarize(deps, &user_id, now).await;
        if !summary.has_signal() {
            continue;
        }

        let notice = notice::combined_reminder(&user.name, &summary);
        if deps.notifier.send_notice(&user.email, &notice).await {
            sent += 1;
        } else {
            tracing::warn!("Combined reminder to {} failed", user.email);
        }
    }

    tracing::info!("Sent {} combined reminder(s)", sent);
    sent
}

async fn summarize(
    deps: &ServiceDependencies,
    user_id: &UserId,
    now: chrono::NaiveDateTime,
) -> ReminderSummary {
    let count_overdue =
        |loans: Vec<Loan>| loans.iter().filter(|loan| loan.is_overdue(now)).count();

    let book_fines = deps.fines.find_by_user_id(ItemKind::Book, user_id).await;
    let cd_fines = deps.fines.find_by_user_id(ItemKind::Cd, user_id).await;

    ReminderSummary {
        overdue_books: count_overdue(deps.loans.find_by_user_id(ItemKind::Book, user_id).await),
        overdue_cds: count_overdue(deps.loans.find_by_user_id(ItemKind::Cd, user_id).await),
        unpaid_book_fines: book_fines.iter().filter(|f| f.is_unpaid()).count(),
        unpaid_cd_fines: cd_fines.iter().filter(|f| f.is_unpaid()).count(),
        book_fine_balance: outstanding_total(&book_fines),
        cd_fine_balance: outstanding_total(&cd_fines),
    }
}

/// 返却期限の事前通知を送信する
///
/// 書籍の貸出のうち、未返却・未延滞で `days_ahead` 日以内に期限が来るものが対象。
///
/// # 戻り値
/// 送信に成功した通知の件数
pub async fn send_return_reminders(deps: &ServiceDependencies, days_ahead: i64) -> usize {
    let now = deps.clock.now();
    let mut sent = 0;

    for loan in deps.loans.find_all(ItemKind::Book).await {
        if !loan.is_due_within(now, days_ahead) {
            continue;
        }
        let Some(user) = active_user(deps, &loan.user_id).await else {
            continue;
        };

        let title = deps
            .catalog
            .title(ItemKind::Book, &loan.item_id)
            .await
            .unwrap_or_else(|| loan.item_id.to_string());

        if deps
            .notifier
            .send_return_reminder(&user, &title, loan.due_date)
            .await
        {
            sent += 1;
        } else {
            tracing::warn!("Return reminder to {} failed", user.email);
        }
    }

    tracing::info!(
        "Sent {} return reminder(s) for loans due within {} day(s)",
        sent,
        days_ahead
    );
    sent
}

/// 歓迎メールを送信する
pub async fn send_welcome_notification(
    deps: &ServiceDependencies,
    user: &User,
    temporary_password: Option<&str>,
) -> bool {
    deps.notifier
        .send_welcome_email(user, temporary_password)
        .await
}

/// 支払い確認を送信する
pub async fn send_payment_notification(
    deps: &ServiceDependencies,
    user: &User,
    paid: Decimal,
    remaining: Decimal,
) -> bool {
    deps.notifier
        .send_payment_confirmation(user, paid, remaining)
        .await
}

/// メール設定を確認する
///
/// 通知サービスを実送信モードに切り替え（元に戻さない）、テストメッセージを送る。
pub async fn test_email_configuration(deps: &ServiceDependencies, address: &str) -> bool {
    deps.notifier.set_real_mode(true);
    let sent = deps
        .notifier
        .send_notice(address, &notice::configuration_test())
        .await;

    if sent {
        tracing::info!("Test email sent to {}", address);
    } else {
        tracing::warn!("Test email to {} failed", address);
    }
    sent
}
