use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FineError, FineId, ItemKind, LoanId, UserId, timestamp};

/// 延滞料金集約 - 1件の延滞貸出に対する金銭的ペナルティ
///
/// 不変条件：
/// - 残額は常に `max(amount - paid_amount, 0)` から導出される（唯一の書き込み経路）
/// - 金額・支払済み金額は負にならない
/// - `is_paid` は全額支払いか管理者の明示的な操作でのみ true になる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FineRecord", into = "FineRecord")]
pub struct Fine {
    id: Option<FineId>,
    user_id: UserId,
    loan_id: LoanId,
    kind: ItemKind,
    amount: Decimal,
    paid_amount: Decimal,
    issued_date: NaiveDateTime,
    paid_date: Option<NaiveDateTime>,
    is_paid: bool,
}

impl Fine {
    /// 延滞料金を作成する
    ///
    /// # エラー
    /// 利用者ID・貸出IDが空、または金額が0以下の場合
    pub fn new(
        user_id: UserId,
        loan_id: LoanId,
        kind: ItemKind,
        amount: Decimal,
        issued_date: NaiveDateTime,
    ) -> Result<Self, FineError> {
        if user_id.is_blank() {
            return Err(FineError::MissingUserId);
        }
        if loan_id.is_blank() {
            return Err(FineError::MissingLoanId);
        }
        if amount <= Decimal::ZERO {
            return Err(FineError::NonPositiveAmount);
        }

        Ok(Self {
            id: None,
            user_id,
            loan_id,
            kind,
            amount,
            paid_amount: Decimal::ZERO,
            issued_date: timestamp::truncate(issued_date),
            paid_date: None,
            is_paid: false,
        })
    }

    pub fn id(&self) -> Option<&FineId> {
        self.id.as_ref()
    }

    /// 初回保存時にのみIDを割り当てる。割当済みなら何もしない。
    pub fn assign_id(&mut self, id: FineId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn loan_id(&self) -> &LoanId {
        &self.loan_id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }

    /// 残額（0で下限クランプ）
    pub fn remaining_amount(&self) -> Decimal {
        (self.amount - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn issued_date(&self) -> NaiveDateTime {
        self.issued_date
    }

    pub fn paid_date(&self) -> Option<NaiveDateTime> {
        self.paid_date
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    /// 未払いか
    ///
    /// 支払済みフラグのみで判定する。残額が0でもフラグが立っていなければ未払い。
    pub fn is_unpaid(&self) -> bool {
        !self.is_paid
    }

    /// 金額を改定する
    pub fn set_amount(&mut self, amount: Decimal) -> Result<(), FineError> {
        if amount < Decimal::ZERO {
            return Err(FineError::NegativeAmount);
        }
        self.amount = amount;
        Ok(())
    }

    /// 支払済み金額を設定する
    ///
    /// 金額を超える値も受け付ける（残額は0にクランプされる）。
    pub fn set_paid_amount(&mut self, paid_amount: Decimal) -> Result<(), FineError> {
        if paid_amount < Decimal::ZERO {
            return Err(FineError::NegativePaidAmount);
        }
        self.paid_amount = paid_amount;
        Ok(())
    }

    /// 管理者による残額の修正
    ///
    /// 残額を直接上書きする代わりに `amount = paid_amount + remaining` として
    /// 金額側を調整し、導出経路を1つに保つ。
    pub fn adjust_remaining(&mut self, remaining: Decimal) -> Result<(), FineError> {
        if remaining < Decimal::ZERO {
            return Err(FineError::NegativeRemainingAmount);
        }
        self.amount = self.paid_amount + remaining;
        Ok(())
    }

    /// 管理者による支払済みフラグの上書き
    pub fn set_paid(&mut self, paid: bool, now: NaiveDateTime) {
        self.is_paid = paid;
        if paid && self.paid_date.is_none() {
            self.paid_date = Some(timestamp::truncate(now));
        }
    }

    /// 支払いを適用する
    ///
    /// ビジネスルール：
    /// - 0以下の支払い、残額を超える支払いは拒否（状態は変更しない）
    /// - 残額がちょうど0になった時点で支払済みとし、支払日を記録する
    ///
    /// 成功時はtrueを返す。
    pub fn make_payment(&mut self, payment: Decimal, now: NaiveDateTime) -> bool {
        if payment <= Decimal::ZERO || payment > self.remaining_amount() {
            return false;
        }

        self.paid_amount += payment;

        if self.remaining_amount().is_zero() && !self.is_paid {
            self.is_paid = true;
            self.paid_date = Some(timestamp::truncate(now));
        }

        true
    }
}

/// 永続化用のフラットなレコード
///
/// `remainingAmount` は可読性のために書き出すが、読み込み時は導出値を使う。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FineRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<FineId>,
    user_id: UserId,
    loan_id: LoanId,
    kind: ItemKind,
    amount: Decimal,
    #[serde(default)]
    paid_amount: Decimal,
    #[serde(default, skip_deserializing)]
    remaining_amount: Decimal,
    #[serde(with = "timestamp")]
    issued_date: NaiveDateTime,
    #[serde(default, with = "timestamp::option")]
    paid_date: Option<NaiveDateTime>,
    #[serde(default)]
    is_paid: bool,
}

impl TryFrom<FineRecord> for Fine {
    type Error = FineError;

    fn try_from(record: FineRecord) -> Result<Self, Self::Error> {
        if record.user_id.is_blank() {
            return Err(FineError::MissingUserId);
        }
        if record.loan_id.is_blank() {
            return Err(FineError::MissingLoanId);
        }
        if record.amount < Decimal::ZERO {
            return Err(FineError::NegativeAmount);
        }
        if record.paid_amount < Decimal::ZERO {
            return Err(FineError::NegativePaidAmount);
        }

        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            loan_id: record.loan_id,
            kind: record.kind,
            amount: record.amount,
            paid_amount: record.paid_amount,
            issued_date: record.issued_date,
            paid_date: record.paid_date,
            is_paid: record.is_paid,
        })
    }
}

impl From<Fine> for FineRecord {
    fn from(fine: Fine) -> Self {
        let remaining_amount = fine.remaining_amount();
        Self {
            id: fine.id,
            user_id: fine.user_id,
            loan_id: fine.loan_id,
            kind: fine.kind,
            amount: fine.amount,
            paid_amount: fine.paid_amount,
            remaining_amount,
            issued_date: fine.issued_date,
            paid_date: fine.paid_date,
            is_paid: fine.is_paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn fine(amount: Decimal) -> Fine {
        Fine::new(
            UserId::new("U1"),
            LoanId::new("L1"),
            ItemKind::Book,
            amount,
            now(),
        )
        .unwrap()
    }

    // TDD: Fine::new() のテスト
    #[test]
    fn test_new_fine_starts_unpaid_with_full_remaining() {
        let fine = fine(dec!(50));

        assert_eq!(fine.user_id().as_str(), "U1");
        assert_eq!(fine.loan_id().as_str(), "L1");
        assert_eq!(fine.amount(), dec!(50));
        assert_eq!(fine.paid_amount(), Decimal::ZERO);
        assert_eq!(fine.remaining_amount(), dec!(50));
        assert_eq!(fine.issued_date(), now());
        assert!(fine.id().is_none());
        assert!(fine.paid_date().is_none());
        assert!(!fine.is_paid());
    }

    #[test]
    fn test_new_fine_rejects_invalid_arguments() {
        let blank_user = Fine::new(UserId::new(""), LoanId::new("L1"), ItemKind::Cd, dec!(5), now());
        assert_eq!(blank_user.unwrap_err(), FineError::MissingUserId);

        let blank_loan = Fine::new(UserId::new("U1"), LoanId::new(" "), ItemKind::Cd, dec!(5), now());
        assert_eq!(blank_loan.unwrap_err(), FineError::MissingLoanId);

        let zero = Fine::new(UserId::new("U1"), LoanId::new("L1"), ItemKind::Cd, dec!(0), now());
        assert_eq!(zero.unwrap_err(), FineError::NonPositiveAmount);

        let negative = Fine::new(UserId::new("U1"), LoanId::new("L1"), ItemKind::Cd, dec!(-1), now());
        assert_eq!(negative.unwrap_err(), FineError::NonPositiveAmount);
    }

    #[test]
    fn test_assign_id_is_immutable_once_set() {
        let mut fine = fine(dec!(10));
        fine.assign_id(FineId::new("FINE_1_1"));
        fine.assign_id(FineId::new("FINE_2_2"));
        assert_eq!(fine.id().unwrap().as_str(), "FINE_1_1");
    }

    // 残額の導出
    #[test]
    fn test_remaining_follows_amount_and_paid_amount() {
        let mut fine = fine(dec!(100));

        fine.set_paid_amount(dec!(30)).unwrap();
        assert_eq!(fine.remaining_amount(), dec!(70));

        fine.set_amount(dec!(120)).unwrap();
        assert_eq!(fine.remaining_amount(), dec!(90));

        fine.set_amount(dec!(20)).unwrap();
        assert_eq!(fine.remaining_amount(), Decimal::ZERO);

        fine.set_paid_amount(dec!(5)).unwrap();
        assert_eq!(fine.remaining_amount(), dec!(15));
    }

    #[test]
    fn test_overpaid_amount_clamps_remaining_without_marking_paid() {
        let mut fine = fine(dec!(40));
        fine.set_paid_amount(dec!(55)).unwrap();

        assert_eq!(fine.paid_amount(), dec!(55));
        assert_eq!(fine.remaining_amount(), Decimal::ZERO);
        assert!(!fine.is_paid());
        assert!(fine.is_unpaid());
    }

    #[test]
    fn test_setters_reject_negative_values() {
        let mut fine = fine(dec!(40));

        assert_eq!(fine.set_amount(dec!(-1)), Err(FineError::NegativeAmount));
        assert_eq!(fine.set_paid_amount(dec!(-0.01)), Err(FineError::NegativePaidAmount));
        assert_eq!(
            fine.adjust_remaining(dec!(-3)),
            Err(FineError::NegativeRemainingAmount)
        );
        assert_eq!(fine.amount(), dec!(40));
        assert_eq!(fine.paid_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_adjust_remaining_moves_amount() {
        let mut fine = fine(dec!(100));
        assert!(fine.make_payment(dec!(30), now()));

        fine.adjust_remaining(dec!(10)).unwrap();

        assert_eq!(fine.amount(), dec!(40));
        assert_eq!(fine.paid_amount(), dec!(30));
        assert_eq!(fine.remaining_amount(), dec!(10));
        assert!(!fine.is_paid());
    }

    // TDD: make_payment() のテスト
    #[test]
    fn test_partial_payment() {
        let mut fine = fine(dec!(100));

        assert!(fine.make_payment(dec!(30), now()));

        assert_eq!(fine.paid_amount(), dec!(30));
        assert_eq!(fine.remaining_amount(), dec!(70));
        assert!(!fine.is_paid());
        assert!(fine.paid_date().is_none());
    }

    #[test]
    fn test_full_payment_marks_paid() {
        let mut fine = fine(dec!(80));
        let paid_at = now() + Duration::days(2);

        assert!(fine.make_payment(dec!(80), paid_at));

        assert_eq!(fine.paid_amount(), dec!(80));
        assert_eq!(fine.remaining_amount(), Decimal::ZERO);
        assert!(fine.is_paid());
        assert_eq!(fine.paid_date(), Some(paid_at));
    }

    #[test]
    fn test_multi_step_payment() {
        let mut fine = fine(dec!(100));

        assert!(fine.make_payment(dec!(30), now()));
        assert!(fine.make_payment(dec!(70), now()));

        assert_eq!(fine.paid_amount(), dec!(100));
        assert_eq!(fine.remaining_amount(), Decimal::ZERO);
        assert!(fine.is_paid());
    }

    #[test]
    fn test_multi_step_payment_in_other_order() {
        let mut fine = fine(dec!(100));

        assert!(fine.make_payment(dec!(70), now()));
        assert!(!fine.make_payment(dec!(31), now()));
        assert!(fine.make_payment(dec!(30), now()));

        assert!(fine.is_paid());
        assert_eq!(fine.paid_amount(), dec!(100));
    }

    #[test]
    fn test_rejected_payments_leave_fine_unchanged() {
        for payment in [dec!(-10), dec!(0), dec!(50)] {
            let mut fine = fine(dec!(40));
            let before = fine.clone();

            assert!(!fine.make_payment(payment, now()));
            assert_eq!(fine, before);
        }
    }

    #[test]
    fn test_payment_after_full_payment_fails() {
        let mut fine = fine(dec!(25));
        assert!(fine.make_payment(dec!(25), now()));

        let before = fine.clone();
        assert!(!fine.make_payment(dec!(0.01), now() + Duration::days(1)));
        assert!(!fine.make_payment(dec!(25), now() + Duration::days(1)));
        assert_eq!(fine, before);
    }

    #[test]
    fn test_set_paid_override_keeps_existing_paid_date() {
        let mut fine = fine(dec!(10));
        fine.set_paid(true, now());
        assert!(fine.is_paid());
        assert_eq!(fine.paid_date(), Some(now()));

        fine.set_paid(true, now() + Duration::days(3));
        assert_eq!(fine.paid_date(), Some(now()));
    }

    // 永続化形式
    #[test]
    fn test_serialized_record_is_flat_with_derived_remaining() {
        let mut fine = fine(dec!(12.50));
        fine.assign_id(FineId::new("FINE_1_2"));
        fine.make_payment(dec!(2.50), now());

        let json = serde_json::to_value(&fine).unwrap();

        assert_eq!(json["id"], "FINE_1_2");
        assert_eq!(json["userId"], "U1");
        assert_eq!(json["kind"], "BOOK");
        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["remainingAmount"], "10.00");
        assert_eq!(json["issuedDate"], "2025-03-01T10:00:00");
        assert!(json["paidDate"].is_null());

        let restored: Fine = serde_json::from_value(json).unwrap();
        assert_eq!(restored, fine);
    }

    #[test]
    fn test_deserialization_ignores_stored_remaining() {
        let json = serde_json::json!({
            "id": "CDFINE_1_1",
            "userId": "U1",
            "loanId": "CDLOAN_1_1",
            "kind": "CD",
            "amount": "20",
            "paidAmount": "5",
            "remainingAmount": "999",
            "issuedDate": "2025-01-01T10:00",
            "isPaid": false
        });

        let fine: Fine = serde_json::from_value(json).unwrap();
        assert_eq!(fine.remaining_amount(), dec!(15));
        assert_eq!(fine.kind(), ItemKind::Cd);
    }

    #[test]
    fn test_deserialization_rejects_negative_amount() {
        let json = serde_json::json!({
            "userId": "U1",
            "loanId": "L1",
            "kind": "BOOK",
            "amount": "-1",
            "issuedDate": "2025-01-01T10:00:00"
        });

        assert!(serde_json::from_value::<Fine>(json).is_err());
    }
}
