use crate::domain::{Fine, FineId, ItemKind, Session, UserId};
use rust_decimal::Decimal;

use super::errors::{LendingError, Result};
use crate::application::ServiceDependencies;

/// 延滞料金を支払う
///
/// 支払いが受け付けられた場合のみ保存する。その後、支払い確認を送信する
/// （送信失敗は支払い結果に影響しない）。
///
/// # エラー
/// - InvalidPaymentAmount: 0以下の支払額
/// - FineNotFound
/// - PaymentRejected: 残額を超える支払い、または支払済み
/// - Persistence: ストアへの書き込み失敗
pub async fn pay_fine(
    deps: &ServiceDependencies,
    kind: ItemKind,
    fine_id: &FineId,
    amount: Decimal,
) -> Result<Fine> {
    if amount <= Decimal::ZERO {
        return Err(LendingError::InvalidPaymentAmount);
    }

    let mut fine = deps
        .fines
        .find_by_id(kind, fine_id)
        .await
        .ok_or(LendingError::FineNotFound)?;

    if !fine.make_payment(amount, deps.clock.now()) {
        tracing::debug!("Payment of {} rejected for fine {}", amount, fine_id);
        return Err(LendingError::PaymentRejected {
            requested: amount,
            remaining: fine.remaining_amount(),
        });
    }

    let updated = deps
        .fines
        .update(&fine)
        .await
        .map_err(LendingError::Persistence)?;
    if !updated {
        return Err(LendingError::FineNotFound);
    }
    tracing::info!(
        "Payment of {} applied to fine {} (remaining {})",
        amount,
        fine_id,
        fine.remaining_amount()
    );

    match deps.users.find_by_id(fine.user_id()).await {
        Some(user) => {
            if !deps
                .notifier
                .send_payment_confirmation(&user, amount, fine.remaining_amount())
                .await
            {
                tracing::warn!("Payment confirmation to {} was not delivered", user.email);
            }
        }
        None => tracing::debug!("No user {} to confirm payment to", fine.user_id()),
    }

    Ok(fine)
}

/// 管理者による残額の修正
///
/// 残額を0にした場合は免除として支払済みにする。
///
/// # エラー
/// - NotAuthorized: 管理者以外のセッション
/// - FineNotFound
/// - InvalidFine: 負の残額
/// - Persistence: ストアへの書き込み失敗
pub async fn adjust_fine(
    deps: &ServiceDependencies,
    session: &Session,
    kind: ItemKind,
    fine_id: &FineId,
    remaining: Decimal,
) -> Result<Fine> {
    if !session.is_admin() {
        return Err(LendingError::NotAuthorized);
    }

    let mut fine = deps
        .fines
        .find_by_id(kind, fine_id)
        .await
        .ok_or(LendingError::FineNotFound)?;

    fine.adjust_remaining(remaining)?;
    if remaining.is_zero() {
        fine.set_paid(true, deps.clock.now());
    }
    let updated = deps
        .fines
        .update(&fine)
        .await
        .map_err(LendingError::Persistence)?;
    if !updated {
        return Err(LendingError::FineNotFound);
    }

    tracing::info!(
        "Fine {} adjusted by {} to remaining {}",
        fine_id,
        session.user_id(),
        remaining
    );
    Ok(fine)
}

/// 利用者の延滞料金を取得する
pub async fn fines_for_user(deps: &ServiceDependencies, kind: ItemKind, user_id: &UserId) -> Vec<Fine> {
    deps.fines.find_by_user_id(kind, user_id).await
}

/// 未払いの延滞料金を取得する
pub async fn unpaid_fines(deps: &ServiceDependencies, kind: ItemKind) -> Vec<Fine> {
    deps.fines.find_unpaid(kind).await
}

/// 利用者に未払いの延滞料金があるか（書籍・CDのいずれか）
pub async fn has_unpaid_fines(deps: &ServiceDependencies, user_id: &UserId) -> bool {
    for kind in ItemKind::ALL {
        if deps
            .fines
            .find_by_user_id(kind, user_id)
            .await
            .iter()
            .any(Fine::is_unpaid)
        {
            return true;
        }
    }
    false
}

/// 利用者の未払い残高（書籍・CDの合計）
pub async fn outstanding_balance(deps: &ServiceDependencies, user_id: &UserId) -> Decimal {
    let mut balance = Decimal::ZERO;
    for kind in ItemKind::ALL {
        balance += deps
            .fines
            .find_by_user_id(kind, user_id)
            .await
            .iter()
            .filter(|fine| fine.is_unpaid())
            .map(Fine::remaining_amount)
            .sum::<Decimal>();
    }
    balance
}
