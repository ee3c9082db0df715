use crate::domain::{ItemKind, Notice, User, notice};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// 通知サービスポート
///
/// 利用者への通知配信メカニズムを抽象化する。
/// 配信失敗はエラーではなく `false` で返し、呼び出し側を止めない。
///
/// 型付きの送信メソッドは文面を組み立てて `send_email` に委ねる。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> bool;

    /// 実送信モードか
    fn is_real_mode(&self) -> bool;

    /// 実送信モードを切り替える
    fn set_real_mode(&self, real_mode: bool);

    /// 組み立て済みの通知を送信する
    async fn send_notice(&self, to: &str, notice: &Notice) -> bool {
        self.send_email(to, &notice.subject, &notice.body).await
    }

    /// 延滞通知を送信する（種別ごと）
    async fn send_overdue_reminder(
        &self,
        user: &User,
        kind: ItemKind,
        overdue_count: usize,
        outstanding: Decimal,
    ) -> bool {
        let notice = notice::overdue_reminder(&user.name, kind, overdue_count, outstanding);
        self.send_notice(&user.email, &notice).await
    }

    /// 返却期限の事前通知を送信する
    async fn send_return_reminder(
        &self,
        user: &User,
        title: &str,
        due_date: NaiveDateTime,
    ) -> bool {
        let notice = notice::return_reminder(&user.name, title, due_date);
        self.send_notice(&user.email, &notice).await
    }

    /// 歓迎メールを送信する
    async fn send_welcome_email(&self, user: &User, temporary_password: Option<&str>) -> bool {
        let notice = notice::welcome(&user.name, &user.email, temporary_password);
        self.send_notice(&user.email, &notice).await
    }

    /// 支払い確認を送信する
    async fn send_payment_confirmation(
        &self,
        user: &User,
        paid: Decimal,
        remaining: Decimal,
    ) -> bool {
        let notice = notice::payment_confirmation(&user.name, paid, remaining);
        self.send_notice(&user.email, &notice).await
    }
}
