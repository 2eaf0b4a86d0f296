//! 오늘 손익 통계.
//!
//! 날짜별 손익을 합산해 오늘의 손익과 두 가지 수익률을 계산합니다:
//! - 예수금 기준 수익률 (`오늘 손익 / 예수금`)
//! - 전일 대비 수익률 (`오늘 손익 / 직전 거래일 평가금`)

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use journal_core::{format_iso_date, percent_of, DecimalExt, TradeEntry};

/// 날짜 문자열별 손익 합계. 날짜가 빈 기록은 제외합니다.
///
/// 키는 저장된 날짜 문자열 그대로이며 사전순으로 정렬됩니다.
pub fn daily_pnl(entries: &[TradeEntry]) -> BTreeMap<String, Decimal> {
    let mut by_date = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.date.is_empty()) {
        let sum = by_date.entry(entry.date.clone()).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(entry.pnl_value());
    }
    by_date
}

/// 오늘 손익 통계
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStats {
    /// 오늘 날짜에 기록된 손익 합계
    pub today_pnl: Decimal,
    /// 예수금
    pub starting_cash: Decimal,
    /// 오늘보다 앞선 마지막 거래일의 평가금 (없으면 예수금)
    pub previous_equity: Decimal,
}

impl TodayStats {
    pub fn compute(entries: &[TradeEntry], starting_cash: Decimal, today: NaiveDate) -> Self {
        let today_key = format_iso_date(today);
        let by_date = daily_pnl(entries);

        let today_pnl = by_date.get(&today_key).copied().unwrap_or(Decimal::ZERO);

        // 날짜 순으로 누적하며 오늘 이전 마지막 평가금을 기억
        let mut equity = starting_cash;
        let mut previous_equity = starting_cash;
        for (date, pnl) in &by_date {
            equity = equity.saturating_add(*pnl);
            if date.as_str() < today_key.as_str() {
                previous_equity = equity;
            }
        }

        Self {
            today_pnl,
            starting_cash,
            previous_equity,
        }
    }

    /// 예수금 기준 수익률 (%). 예수금이 0 이하이거나 Decimal 범위를 넘으면 `None`.
    pub fn return_on_cash(&self) -> Option<Decimal> {
        percent_of(self.today_pnl, self.starting_cash)
    }

    /// 전일 평가금 대비 수익률 (%). 평가금이 0 이하이거나 범위를 넘으면 `None`.
    pub fn return_vs_previous(&self) -> Option<Decimal> {
        percent_of(self.today_pnl, self.previous_equity)
    }

    pub fn return_on_cash_display(&self) -> String {
        percent_or_dash(self.return_on_cash())
    }

    pub fn return_vs_previous_display(&self) -> String {
        percent_or_dash(self.return_vs_previous())
    }

    /// "예수금 기준: x.xx% / 전일 대비: y.yy%" 형식의 요약.
    pub fn summary_line(&self) -> String {
        format!(
            "예수금 기준: {} / 전일 대비: {}",
            self.return_on_cash_display(),
            self.return_vs_previous_display()
        )
    }
}

fn percent_or_dash(value: Option<Decimal>) -> String {
    value
        .map(|v| v.to_percent_display())
        .unwrap_or_else(|| "-".to_string())
}
