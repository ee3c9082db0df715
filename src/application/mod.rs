pub mod account;
pub mod catalog;
pub mod lending;
pub mod notification;

use crate::config::LendingPolicy;
use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// 各ユースケースは関数として実装され、この構造体を引数に受け取る。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub users: Arc<dyn UserRepository>,
    pub loans: Arc<dyn LoanRepository>,
    pub fines: Arc<dyn FineRepository>,
    pub catalog: Arc<dyn Catalog>,
    pub notifier: Arc<dyn NotificationService>,
    pub security: Arc<dyn SecurityService>,
    pub clock: Arc<dyn Clock>,
    pub policy: LendingPolicy,
}
