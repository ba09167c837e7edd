//! 考勤日期处理
//!
//! 考勤日期统一归一化为 UTC 零点，并以秒级时间戳存储。

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::errors::{Result, SchoolError};

/// 解析提交的日期，接受 `YYYY-MM-DD` 或 RFC 3339 时间（取其 UTC 日期）
pub fn parse_attendance_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SchoolError::date_parse("日期不能为空"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|e| SchoolError::date_parse(format!("无效的日期 '{input}': {e}")))
}

/// 当天零点的时间戳
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp()
}

pub fn timestamp_to_date(ts: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .date_naive()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_attendance_date("2024-01-10").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_day() {
        let date = parse_attendance_date("2024-01-10T15:30:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_attendance_date("").is_err());
        assert!(parse_attendance_date("yesterday").is_err());
        assert_eq!(
            parse_attendance_date("2024-02-30").unwrap_err().code(),
            "E007"
        );
    }

    #[test]
    fn test_timestamp_is_midnight_and_reversible() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let ts = date_to_timestamp(date);
        assert_eq!(ts % 86_400, 0);
        assert_eq!(timestamp_to_date(ts), date);
        assert_eq!(format_date(date), "2024-01-10");
    }
}
