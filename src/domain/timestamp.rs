//! ローカル日時（タイムゾーンなし）の文字列表現
//!
//! 永続化形式は `yyyy-MM-ddTHH:mm:ss`。読み込み時は秒の省略と小数秒も受け付ける。

use chrono::{NaiveDateTime, ParseResult, SubsecRound};
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 永続化形式の文字列に変換する
pub fn format(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

/// 永続化形式の文字列を解析する
pub fn parse(value: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
}

/// 秒未満を切り捨てる（永続化の往復で値が変わらないようにする）
pub fn truncate(value: NaiveDateTime) -> NaiveDateTime {
    value.trunc_subsecs(0)
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// `Option<NaiveDateTime>` 用
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&super::format(v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_format_uses_iso_local_seconds() {
        assert_eq!(format(&at(2025, 1, 10, 12, 0)), "2025-01-10T12:00:00");
    }

    #[test]
    fn test_parse_accepts_minutes_only() {
        assert_eq!(parse("2024-12-25T12:30").unwrap(), at(2024, 12, 25, 12, 30));
    }

    #[test]
    fn test_parse_accepts_fractional_seconds() {
        let parsed = parse("2025-01-01T15:00:00.123").unwrap();
        assert_eq!(truncate(parsed), at(2025, 1, 1, 15, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("not a date").is_err());
    }
}
