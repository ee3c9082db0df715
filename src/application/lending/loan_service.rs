use crate::domain::{self, Fine, ItemId, ItemKind, Loan, LoanId, UserId};
use rust_decimal::Decimal;

use super::errors::{LendingError, Result};
use super::fine_service::{has_unpaid_fines, outstanding_balance};
use crate::application::ServiceDependencies;

/// 返却処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub loan: Loan,
    /// 延滞していた場合に発行された延滞料金
    pub fine: Option<Fine>,
}

/// 資料を貸し出す
///
/// ビジネスルール：
/// - 利用者が存在し、有効であること
/// - 資料が存在し、貸出可能であること
/// - （方針で有効な場合）利用者に未払いの延滞料金がないこと
///
/// 返却期限は現在時刻 + 種別ごとの貸出期間。
///
/// # エラー
/// - UserNotFound / UserInactive
/// - ItemNotFound / ItemNotAvailable
/// - OutstandingFines
/// - InvalidLoanDate: 返却期限が日付の範囲を超える
/// - Persistence: ストアへの書き込み失敗
pub async fn borrow_item(
    deps: &ServiceDependencies,
    kind: ItemKind,
    user_id: &UserId,
    item_id: &ItemId,
) -> Result<Loan> {
    // 1. 利用者の確認
    let user = deps
        .users
        .find_by_id(user_id)
        .await
        .ok_or(LendingError::UserNotFound)?;
    if !user.active {
        return Err(LendingError::UserInactive);
    }

    // 2. 資料の貸出可否確認
    let item = deps
        .catalog
        .find(kind, item_id)
        .await
        .ok_or(LendingError::ItemNotFound)?;
    if !item.available {
        return Err(LendingError::ItemNotAvailable);
    }

    // 3. 未払いの延滞料金の確認（両トラック）
    if deps.policy.block_on_outstanding_fines && has_unpaid_fines(deps, user_id).await {
        let balance = outstanding_balance(deps, user_id).await;
        tracing::debug!("Borrow refused for {}: outstanding {}", user_id, balance);
        return Err(LendingError::OutstandingFines(balance));
    }

    // 4. ドメイン層の純粋関数で貸出を作成
    let now = deps.clock.now();
    let mut loan = domain::loan::borrow(
        user_id.clone(),
        item_id.clone(),
        kind,
        now,
        deps.policy.track(kind).loan_period_days,
    )?;

    // 5. 資料を貸出中にしてから貸出を保存する
    let marked = deps
        .catalog
        .set_available(kind, item_id, false)
        .await
        .map_err(LendingError::Persistence)?;
    if !marked {
        return Err(LendingError::ItemNotFound);
    }
    if let Err(e) = deps.loans.save(&mut loan).await {
        if let Err(revert) = deps.catalog.set_available(kind, item_id, true).await {
            tracing::warn!("Failed to release {} {}: {}", kind, item_id, revert);
        }
        return Err(LendingError::Persistence(e));
    }

    tracing::info!(
        "{} {} borrowed by {} until {}",
        kind,
        item_id,
        user_id,
        domain::timestamp::format(&loan.due_date)
    );
    Ok(loan)
}

/// 資料を返却する
///
/// ビジネスルール：
/// - 返却済みの貸出は返却できない
/// - 返却時点で延滞していれば 延滞日数 × 種別ごとの日額 の延滞料金を発行する
///   （金額が0の場合、つまり延滞が1日未満の場合は発行しない）
///
/// # エラー
/// - LoanNotFound / AlreadyReturned
/// - Persistence: ストアへの書き込み失敗
pub async fn return_item(
    deps: &ServiceDependencies,
    kind: ItemKind,
    loan_id: &LoanId,
) -> Result<ReturnOutcome> {
    let mut loan = deps
        .loans
        .find_by_id(kind, loan_id)
        .await
        .ok_or(LendingError::LoanNotFound)?;
    if loan.is_returned {
        return Err(LendingError::AlreadyReturned);
    }

    let now = deps.clock.now();
    let overdue_days = loan.overdue_days(now);

    // 1. 返却を記録
    loan.mark_returned();
    loan.return_date = Some(domain::timestamp::truncate(now));
    let updated = deps
        .loans
        .update(&loan)
        .await
        .map_err(LendingError::Persistence)?;
    if !updated {
        return Err(LendingError::LoanNotFound);
    }

    // 資料がカタログから削除されていても返却自体は完了させる
    let released = deps
        .catalog
        .set_available(kind, &loan.item_id, true)
        .await
        .map_err(LendingError::Persistence)?;
    if !released {
        tracing::warn!("Returned item {} is no longer in the catalog", loan.item_id);
    }

    // 2. 延滞料金の発行
    let amount = Decimal::from(overdue_days) * deps.policy.track(kind).fine_per_day;
    let fine = if amount > Decimal::ZERO {
        let mut fine = Fine::new(loan.user_id.clone(), loan_id.clone(), kind, amount, now)?;
        deps.fines
            .save(&mut fine)
            .await
            .map_err(LendingError::Persistence)?;
        tracing::info!(
            "Fine of {} issued to {} for {} day(s) overdue",
            amount,
            loan.user_id,
            overdue_days
        );
        Some(fine)
    } else {
        None
    };

    tracing::info!("Loan {} returned", loan_id);
    Ok(ReturnOutcome { loan, fine })
}

/// 返却期限を延長する
///
/// 延長日数の上限は設けない。
///
/// # エラー
/// - LoanNotFound / AlreadyReturned
/// - InvalidLoanDate: 延長後の返却期限が日付の範囲を超える
/// - Persistence: ストアへの書き込み失敗
pub async fn extend_loan(
    deps: &ServiceDependencies,
    kind: ItemKind,
    loan_id: &LoanId,
    days: i64,
) -> Result<Loan> {
    let mut loan = deps
        .loans
        .find_by_id(kind, loan_id)
        .await
        .ok_or(LendingError::LoanNotFound)?;
    if loan.is_returned {
        return Err(LendingError::AlreadyReturned);
    }

    loan.extend(days)?;
    let updated = deps
        .loans
        .update(&loan)
        .await
        .map_err(LendingError::Persistence)?;
    if !updated {
        return Err(LendingError::LoanNotFound);
    }

    tracing::info!(
        "Loan {} extended by {} day(s) to {}",
        loan_id,
        days,
        domain::timestamp::format(&loan.due_date)
    );
    Ok(loan)
}

/// 延滞中の貸出を取得する
pub async fn find_overdue(deps: &ServiceDependencies, kind: ItemKind) -> Vec<Loan> {
    deps.loans.find_overdue(kind, deps.clock.now()).await
}

/// 利用者の貸出を取得する
pub async fn loans_for_user(deps: &ServiceDependencies, kind: ItemKind, user_id: &UserId) -> Vec<Loan> {
    deps.loans.find_by_user_id(kind, user_id).await
}
