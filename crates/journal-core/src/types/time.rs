//! 날짜/시각 변환 도우미.
//!
//! 매매일지는 사용자의 로컬 달력 기준으로 동작하므로, 시각 비교는
//! 모두 로컬 벽시계 시각(`NaiveDateTime`)으로 수행합니다.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// `YYYY-MM-DD` 형식 날짜를 해석합니다.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// 날짜를 `YYYY-MM-DD` 문자열로 변환합니다.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 에포크 밀리초를 로컬 벽시계 시각으로 변환합니다.
///
/// 표현할 수 없는 값은 에포크 시각으로 대체합니다.
pub fn local_datetime_from_millis(millis: i64) -> NaiveDateTime {
    match Local.timestamp_millis_opt(millis).earliest() {
        Some(dt) => dt.naive_local(),
        None => DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
    }
}

/// 날짜 문자열을 UTC 자정의 에포크 밀리초로 변환합니다.
///
/// CSV 가져오기에서 `createdAt`이 없을 때 정렬 키로 사용합니다.
pub fn utc_midnight_millis(raw: &str) -> Option<i64> {
    parse_iso_date(raw)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
