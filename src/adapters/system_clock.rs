use crate::domain::timestamp;
use crate::ports::Clock;
use chrono::{Local, NaiveDateTime};

/// システムのローカル時刻（秒単位に切り捨て）
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        timestamp::truncate(Local::now().naive_local())
    }
}
