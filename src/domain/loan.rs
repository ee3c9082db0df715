use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::{ItemId, ItemKind, LoanError, LoanId, UserId, timestamp};

/// Loan集約 - 1つの資料（書籍またはCD）の1回の貸出
///
/// 状態の変更は貸出サービスが行う。エンティティは仕組みだけを持ち、
/// 返却日の記録や延滞料金の計算といった方針は持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    // 識別子（初回保存時に割り当て）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LoanId>,

    // 他の集約への参照（IDのみ）
    pub user_id: UserId,
    pub item_id: ItemId,
    pub kind: ItemKind,

    // 貸出管理の責務
    #[serde(with = "timestamp")]
    pub borrow_date: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub due_date: NaiveDateTime,
    #[serde(default, with = "timestamp::option")]
    pub return_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_returned: bool,
}

impl Loan {
    /// 延滞判定
    ///
    /// 未返却かつ現在時刻が返却期限を過ぎている場合のみ延滞とする。
    /// 期限ちょうどは延滞ではない。
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        is_overdue(self, now)
    }

    /// 延滞日数（切り捨て、延滞していなければ0）
    pub fn overdue_days(&self, now: NaiveDateTime) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        (now - self.due_date).num_days().max(0)
    }

    /// 返却期限を `days` 日ずらす
    ///
    /// 上限・下限は設けない（呼び出し側の責務）。日付の表現範囲を超える場合は
    /// エラーとし、返却期限は変更しない。
    pub fn extend(&mut self, days: i64) -> Result<(), LoanError> {
        self.due_date = shift_days(self.due_date, days)?;
        Ok(())
    }

    /// 返却済みにする
    pub fn mark_returned(&mut self) {
        self.is_returned = true;
    }

    /// 返却期限まで `days_ahead` 日以内で、まだ延滞していない貸出か
    ///
    /// 期限の範囲が日付の表現範囲を超える場合は上限なしとして扱う。
    pub fn is_due_within(&self, now: NaiveDateTime, days_ahead: i64) -> bool {
        if self.is_returned || self.is_overdue(now) {
            return false;
        }
        match shift_days(now, days_ahead) {
            Ok(horizon) => self.due_date <= horizon,
            Err(_) => days_ahead > 0,
        }
    }
}

/// 日時を `days` 日ずらす（範囲外ならエラー）
fn shift_days(at: NaiveDateTime, days: i64) -> Result<NaiveDateTime, LoanError> {
    TimeDelta::try_days(days)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or(LoanError::DateOutOfRange { days })
}

/// 純粋関数：延滞判定
///
/// 書籍・CDの両トラックで共通の延滞方針。
pub fn is_overdue(loan: &Loan, now: NaiveDateTime) -> bool {
    !loan.is_returned && now > loan.due_date
}

/// 純粋関数：資料を貸し出す
///
/// ビジネスルール：
/// - 返却期限は貸出日時 + 貸出期間（日数）
/// - 未返却状態で作成する
///
/// 副作用なし。新しいLoanを返す（IDは保存時に割り当てられる）。
///
/// # エラー
/// 返却期限が日付の表現範囲を超える場合
pub fn borrow(
    user_id: UserId,
    item_id: ItemId,
    kind: ItemKind,
    borrowed_at: NaiveDateTime,
    loan_period_days: i64,
) -> Result<Loan, LoanError> {
    let borrow_date = timestamp::truncate(borrowed_at);
    let due_date = shift_days(borrow_date, loan_period_days)?;

    Ok(Loan {
        id: None,
        user_id,
        item_id,
        kind,
        borrow_date,
        due_date,
        return_date: None,
        is_returned: false,
    })
}
