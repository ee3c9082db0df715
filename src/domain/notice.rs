//! 通知文面の純粋関数
//!
//! 件名と本文の組み立てのみを行い、送信は通知サービスポートに任せる。

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::ItemKind;

/// 送信する通知（件名と本文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub subject: String,
    pub body: String,
}

/// 1人の利用者に関する未解決シグナルの集計
///
/// まとめ通知（combined reminder）の判断と本文に使う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderSummary {
    pub overdue_books: usize,
    pub overdue_cds: usize,
    pub unpaid_book_fines: usize,
    pub unpaid_cd_fines: usize,
    pub book_fine_balance: Decimal,
    pub cd_fine_balance: Decimal,
}

impl ReminderSummary {
    /// 通知すべきシグナルが1つでもあるか
    pub fn has_signal(&self) -> bool {
        self.overdue_books > 0
            || self.overdue_cds > 0
            || self.unpaid_book_fines > 0
            || self.unpaid_cd_fines > 0
    }

    pub fn total_balance(&self) -> Decimal {
        self.book_fine_balance + self.cd_fine_balance
    }
}

/// 延滞通知（種別ごと）
pub fn overdue_reminder(
    user_name: &str,
    kind: ItemKind,
    overdue_count: usize,
    outstanding: Decimal,
) -> Notice {
    let subject = match kind {
        ItemKind::Book => "Library Reminder: Overdue Books".to_string(),
        ItemKind::Cd => "Library Reminder: Overdue CDs".to_string(),
    };

    let mut body = format!(
        "Dear {},\n\nYou have {} overdue {} loan(s).\n",
        user_name,
        overdue_count,
        kind.label()
    );
    if outstanding > Decimal::ZERO {
        body.push_str(&format!(
            "Outstanding {} fines: {:.2} NIS\n",
            kind.label(),
            outstanding
        ));
    }
    body.push_str("\nPlease return the items as soon as possible.\n\nLibrary Management System");

    Notice { subject, body }
}

/// まとめ通知（利用者ごとに最大1通）
pub fn combined_reminder(user_name: &str, summary: &ReminderSummary) -> Notice {
    let mut body = format!("Dear {},\n\nHere is a summary of your library account:\n", user_name);

    if summary.overdue_books > 0 {
        body.push_str(&format!("- Overdue books: {}\n", summary.overdue_books));
    }
    if summary.overdue_cds > 0 {
        body.push_str(&format!("- Overdue CDs: {}\n", summary.overdue_cds));
    }
    if summary.unpaid_book_fines > 0 {
        body.push_str(&format!(
            "- Unpaid book fines: {} ({:.2} NIS)\n",
            summary.unpaid_book_fines, summary.book_fine_balance
        ));
    }
    if summary.unpaid_cd_fines > 0 {
        body.push_str(&format!(
            "- Unpaid CD fines: {} ({:.2} NIS)\n",
            summary.unpaid_cd_fines, summary.cd_fine_balance
        ));
    }
    if summary.total_balance() > Decimal::ZERO {
        body.push_str(&format!("\nTotal outstanding: {:.2} NIS\n", summary.total_balance()));
    }
    body.push_str("\nLibrary Management System");

    Notice {
        subject: "Library Account Reminder".to_string(),
        body,
    }
}

/// 返却期限の事前通知
pub fn return_reminder(user_name: &str, title: &str, due_date: NaiveDateTime) -> Notice {
    Notice {
        subject: format!("Return Reminder: {}", title),
        body: format!(
            "Dear {},\n\n\"{}\" is due on {}.\nPlease return or extend it before the due date.\n\nLibrary Management System",
            user_name,
            title,
            due_date.format("%Y-%m-%d %H:%M")
        ),
    }
}

/// 登録時の歓迎メール
pub fn welcome(user_name: &str, email: &str, temporary_password: Option<&str>) -> Notice {
    let mut body = format!(
        "Dear {},\n\nWelcome to the library! Your account ({}) is ready.\n",
        user_name, email
    );
    if let Some(password) = temporary_password {
        body.push_str(&format!(
            "Temporary password: {}\nPlease change it after your first login.\n",
            password
        ));
    }
    body.push_str("\nLibrary Management System");

    Notice {
        subject: "Welcome to the Library".to_string(),
        body,
    }
}

/// 支払い確認
pub fn payment_confirmation(user_name: &str, paid: Decimal, remaining: Decimal) -> Notice {
    let status = if remaining.is_zero() {
        "Your fine is now fully paid.".to_string()
    } else {
        format!("Remaining balance: {:.2} NIS", remaining)
    };

    Notice {
        subject: "Payment Confirmation".to_string(),
        body: format!(
            "Dear {},\n\nWe received your payment of {:.2} NIS.\n{}\n\nLibrary Management System",
            user_name, paid, status
        ),
    }
}

/// メール設定の疎通確認
pub fn configuration_test() -> Notice {
    Notice {
        subject: "Library Email Configuration Test".to_string(),
        body: "This is a test message from the library notification service.".to_string(),
    }
}
