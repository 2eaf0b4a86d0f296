//! 조회 기간 프리셋.
//!
//! 프리셋 이름(ALL, WEEK, 1M, 3M, 6M, 1Y)과 현재 시각으로 구체적인 조회 구간을 계산합니다.
//! 계산은 (프리셋, 현재 시각)만의 순수 함수입니다.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use journal_core::TradeEntry;

/// 조회 기간 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangePreset {
    /// 전체 기간
    #[default]
    All,
    /// 이번 주 (월요일 시작)
    Week,
    /// 최근 1개월
    OneMonth,
    /// 최근 3개월
    ThreeMonths,
    /// 최근 6개월
    SixMonths,
    /// 최근 1년
    OneYear,
}

impl RangePreset {
    /// 툴바 순서대로의 전체 프리셋 목록.
    pub const ALL_PRESETS: [RangePreset; 6] = [
        RangePreset::All,
        RangePreset::Week,
        RangePreset::OneMonth,
        RangePreset::ThreeMonths,
        RangePreset::SixMonths,
        RangePreset::OneYear,
    ];

    /// 프리셋 레이블 (`ALL`, `WEEK`, `1M`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::All => "ALL",
            RangePreset::Week => "WEEK",
            RangePreset::OneMonth => "1M",
            RangePreset::ThreeMonths => "3M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1Y",
        }
    }

    /// 프리셋의 표시 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            RangePreset::All => "전체",
            RangePreset::Week => "이번 주",
            RangePreset::OneMonth => "1개월",
            RangePreset::ThreeMonths => "3개월",
            RangePreset::SixMonths => "6개월",
            RangePreset::OneYear => "1년",
        }
    }

    fn months_back(&self) -> Option<u32> {
        match self {
            RangePreset::OneMonth => Some(1),
            RangePreset::ThreeMonths => Some(3),
            RangePreset::SixMonths => Some(6),
            RangePreset::OneYear => Some(12),
            RangePreset::All | RangePreset::Week => None,
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL_PRESETS
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown range preset: {}. Use: ALL, WEEK, 1M, 3M, 6M, 1Y", s))
    }
}

/// 구체적인 조회 구간.
///
/// `from`이 `None`이면 과거 방향으로 제한이 없고, `to`가 `None`이면 조회 시점의 현재 시각을 상한으로 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWindow {
    pub preset: RangePreset,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl Default for RangeWindow {
    fn default() -> Self {
        Self::all()
    }
}

impl RangeWindow {
    /// 제한 없는 전체 구간.
    pub fn all() -> Self {
        Self {
            preset: RangePreset::All,
            from: None,
            to: None,
        }
    }

    /// 프리셋과 현재 시각으로 구간을 계산합니다.
    ///
    /// 모든 프리셋에서 `to`는 `now`입니다.
    pub fn from_preset(preset: RangePreset, now: NaiveDateTime) -> Self {
        let from = match preset {
            RangePreset::All => None,
            RangePreset::Week => Some(start_of_week(now)),
            other => other
                .months_back()
                .map(|months| months_before(now.date(), months)),
        };

        Self {
            preset,
            from,
            to: Some(now),
        }
    }

    /// 상한 시각. 지정되지 않았으면 `now`.
    pub fn upper_bound(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.to.unwrap_or(now)
    }

    /// 시작 시각보다 앞선 시각인지 여부 (기준 자산 계산용).
    pub fn is_before(&self, at: NaiveDateTime) -> bool {
        self.from.is_some_and(|from| at < from)
    }

    /// 시각이 구간 안에 있는지 여부 (하한·상한 모두 포함).
    pub fn contains(&self, at: NaiveDateTime, now: NaiveDateTime) -> bool {
        !self.is_before(at) && at <= self.upper_bound(now)
    }

    /// 구간 안의 기록만 원래 순서대로 골라냅니다.
    pub fn filter<'a>(&self, entries: &'a [TradeEntry], now: NaiveDateTime) -> Vec<&'a TradeEntry> {
        entries
            .iter()
            .filter(|e| self.contains(e.effective_at(), now))
            .collect()
    }
}

/// 이번 주 월요일 자정. 일요일은 7일째로 취급합니다.
fn start_of_week(now: NaiveDateTime) -> NaiveDateTime {
    let days_since_monday = now.weekday().num_days_from_monday() as u64;
    let monday = now
        .date()
        .checked_sub_days(chrono::Days::new(days_since_monday))
        .unwrap_or(NaiveDate::MIN);
    monday.and_time(NaiveTime::default())
}

/// `months`개월 전 같은 날의 자정. 없는 날짜는 그 달의 말일로 당깁니다.
fn months_before(date: NaiveDate, months: u32) -> NaiveDateTime {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 15)
            .unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_week_from_wednesday() {
        // 2024-01-10은 수요일
        let now = at(2024, 1, 10, 14);
        let window = RangeWindow::from_preset(RangePreset::Week, now);

        assert_eq!(window.from, Some(midnight(2024, 1, 8)));
        assert_eq!(window.to, Some(now));
    }

    #[test]
    fn test_week_from_sunday_and_monday() {
        let sunday = RangeWindow::from_preset(RangePreset::Week, at(2024, 1, 14, 23));
        assert_eq!(sunday.from, Some(midnight(2024, 1, 8)));

        let monday = RangeWindow::from_preset(RangePreset::Week, at(2024, 1, 8, 9));
        assert_eq!(monday.from, Some(midnight(2024, 1, 8)));
    }

    #[test]
    fn test_month_presets() {
        let now = at(2024, 5, 15, 10);

        let one = RangeWindow::from_preset(RangePreset::OneMonth, now);
        assert_eq!(one.from, Some(midnight(2024, 4, 15)));

        let three = RangeWindow::from_preset(RangePreset::ThreeMonths, now);
        assert_eq!(three.from, Some(midnight(2024, 2, 15)));

        let six = RangeWindow::from_preset(RangePreset::SixMonths, now);
        assert_eq!(six.from, Some(midnight(2023, 11, 15)));

        let year = RangeWindow::from_preset(RangePreset::OneYear, now);
        assert_eq!(year.from, Some(midnight(2023, 5, 15)));
    }

    #[test]
    fn test_month_end_is_clamped() {
        let window = RangeWindow::from_preset(RangePreset::OneMonth, at(2024, 3, 31, 8));
        assert_eq!(window.from, Some(midnight(2024, 2, 29)));
    }

    #[test]
    fn test_all_is_unbounded_below() {
        let now = at(2024, 5, 15, 10);
        let window = RangeWindow::from_preset(RangePreset::All, now);

        assert_eq!(window.from, None);
        assert!(!window.is_before(midnight(1990, 1, 1)));
        assert!(window.contains(midnight(1990, 1, 1), now));
        assert!(!window.contains(midnight(2024, 5, 16), now));
    }

    #[test]
    fn test_contains_bounds() {
        let now = at(2024, 1, 10, 14);
        let window = RangeWindow::from_preset(RangePreset::Week, now);

        assert!(window.contains(midnight(2024, 1, 8), now));
        assert!(!window.contains(at(2024, 1, 7, 23), now));
        assert!(window.is_before(at(2024, 1, 7, 23)));
        assert!(window.contains(midnight(2024, 1, 10), now));
        assert!(!window.contains(midnight(2024, 1, 11), now));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("1m".parse::<RangePreset>().unwrap(), RangePreset::OneMonth);
        assert_eq!("week".parse::<RangePreset>().unwrap(), RangePreset::Week);
        assert_eq!(" ALL ".parse::<RangePreset>().unwrap(), RangePreset::All);
        assert!("2W".parse::<RangePreset>().is_err());
        assert_eq!(RangePreset::OneYear.to_string(), "1Y");
    }
}
