#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use library_lending::adapters::json::JsonRepositories;
use library_lending::adapters::mock::{
    FixedClock, NotificationService as MockNotificationService,
    SecurityService as MockSecurityService,
};
use library_lending::application::ServiceDependencies;
use library_lending::config::LendingPolicy;
use library_lending::domain::{Item, ItemKind, Loan, Role, User, loan};
use library_lending::ports::*;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// テストの基準時刻（2025-01-15 10:00:00）
pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

/// 一時ディレクトリ上のJSONストアと固定時刻で組み立てた図書館
pub struct TestLibrary {
    pub dir: TempDir,
    pub deps: ServiceDependencies,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<MockNotificationService>,
}

impl TestLibrary {
    pub async fn new() -> Self {
        Self::with_policy(LendingPolicy::default()).await
    }

    pub async fn with_policy(policy: LendingPolicy) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let repositories = JsonRepositories::open(dir.path()).await;
        let clock = Arc::new(FixedClock::new(base_time()));
        let notifier = Arc::new(MockNotificationService::new());

        let deps = ServiceDependencies {
            users: repositories.users,
            loans: repositories.loans,
            fines: repositories.fines,
            catalog: repositories.catalog,
            notifier: notifier.clone(),
            security: Arc::new(MockSecurityService::new()),
            clock: clock.clone(),
            policy,
        };

        Self {
            dir,
            deps,
            clock,
            notifier,
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.deps.clock.now()
    }

    /// 利用者を直接保存する
    pub async fn add_user(&self, name: &str, email: &str) -> User {
        let mut user = User::new(name, email, "plain:password", Role::Regular, self.now());
        self.deps.users.save(&mut user).await.unwrap();
        user
    }

    pub async fn add_admin(&self, name: &str, email: &str) -> User {
        let mut user = User::new(name, email, "plain:password", Role::Admin, self.now());
        self.deps.users.save(&mut user).await.unwrap();
        user
    }

    /// 資料を直接保存する
    pub async fn add_item(&self, kind: ItemKind, title: &str) -> Item {
        let mut item = Item::new(kind, title, "Someone", self.now());
        self.deps.catalog.save(&mut item).await.unwrap();
        item
    }

    /// 返却期限が `now + due_in` の貸出を直接保存する
    pub async fn add_loan_due_in(&self, user: &User, item: &Item, due_in: Duration) -> Loan {
        let period = self.deps.policy.track(item.kind).loan_period_days;
        let borrowed_at = self.now() + due_in - Duration::days(period);
        let mut loan = loan::borrow(
            user.id.clone().unwrap(),
            item.id.clone().unwrap(),
            item.kind,
            borrowed_at,
            period,
        )
        .unwrap();
        self.deps.loans.save(&mut loan).await.unwrap();
        loan
    }
}
