use chrono::NaiveDateTime;

/// 時刻ポート
///
/// 延滞判定・返却期限計算はすべてこの時刻源を使う（ローカル時刻、タイムゾーンなし）。
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
