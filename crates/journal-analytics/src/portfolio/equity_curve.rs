//! 자산 곡선(Equity Curve) 데이터 모듈
//!
//! 조회 구간 안의 매매 기록을 누적하여 예수금 기준의 자산 곡선을 만듭니다.
//!
//! # 계산 순서
//!
//! 1. 기준 자산 = 예수금 + 구간 시작 이전 기록들의 손익 합
//! 2. 구간 안의 기록을 유효 시각 오름차순으로 안정 정렬
//! 3. 기준점 하나 + 기록마다 누적 손익을 더한 포인트
//! 4. 포인트가 기준점 하나뿐이면 현재 날짜로 평평한 포인트를 하나 더 추가
//!
//! 결과 곡선은 항상 2개 이상의 포인트를 갖습니다.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use journal_core::{format_iso_date, percent_of, DecimalExt, TradeEntry};

use crate::range::RangeWindow;

/// 기준점 레이블 (구간 시작도, 기록도 없을 때).
pub const START_LABEL: &str = "Start";

/// 단일 자산 곡선 데이터 포인트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// X축 레이블 (날짜 문자열)
    pub label: String,

    /// 자산 가치
    pub equity: Decimal,

    /// 기준점 대비 누적 손익
    pub pnl: Decimal,
}

/// 구간 자산 곡선과 요약 값
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquitySeries {
    /// 구간 시작 시점의 자산 (예수금 + 이전 손익)
    pub baseline_equity: Decimal,

    /// 마지막 자산 가치
    pub last_equity: Decimal,

    /// 구간 누적 손익
    pub total_pnl: Decimal,

    /// 시계열 포인트 (첫 포인트는 기준점)
    pub points: Vec<EquityPoint>,
}

impl EquitySeries {
    /// 기록 목록과 조회 구간으로 자산 곡선을 계산합니다.
    ///
    /// # 매개변수
    ///
    /// * `entries` - 전체 매매 기록 (저장 순서)
    /// * `window` - 조회 구간
    /// * `starting_cash` - 예수금
    /// * `now` - 현재 로컬 시각 (상한이 없는 구간과 빈 구간 레이블에 사용)
    pub fn build(
        entries: &[TradeEntry],
        window: &RangeWindow,
        starting_cash: Decimal,
        now: NaiveDateTime,
    ) -> Self {
        let pnl_before: Decimal = entries
            .iter()
            .filter(|e| window.is_before(e.effective_at()))
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.pnl_value()));
        let baseline = starting_cash.saturating_add(pnl_before);

        let mut rows = window.filter(entries, now);
        // sort_by_key는 안정 정렬이므로 같은 날짜는 저장 순서를 유지
        rows.sort_by_key(|e| e.effective_at());

        let first_label = match window.from {
            Some(from) => format_iso_date(from.date()),
            None => rows
                .first()
                .map(|e| e.date.clone())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| START_LABEL.to_string()),
        };

        let mut builder = EquitySeriesBuilder::new(baseline, first_label);
        for entry in rows {
            builder.add_pnl(entry.label(), entry.pnl_value());
        }

        builder.build(format_iso_date(window.upper_bound(now).date()))
    }

    /// 구간 누적 수익률 (%). 기준 자산이 0 이하이거나 Decimal 범위를 넘으면 0.
    pub fn cumulative_return_pct(&self) -> Decimal {
        let gain = self.last_equity.saturating_sub(self.baseline_equity);
        percent_of(gain, self.baseline_equity).unwrap_or(Decimal::ZERO)
    }

    /// 누적 수익률 표시 문자열. 기준 자산이 정확히 0이면 "-".
    pub fn cumulative_return_display(&self) -> String {
        if self.baseline_equity.is_zero() {
            "-".to_string()
        } else {
            self.cumulative_return_pct().to_percent_display()
        }
    }

    /// 포인트 수
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 포인트가 없는지 여부 (`build`로 만든 곡선은 항상 false)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 자산 곡선 빌더
///
/// 기준점에서 시작해 손익을 순차적으로 누적합니다.
#[derive(Debug, Clone)]
pub struct EquitySeriesBuilder {
    baseline: Decimal,
    cumulative: Decimal,
    points: Vec<EquityPoint>,
}

impl EquitySeriesBuilder {
    /// 기준점 하나를 가진 빌더를 생성합니다.
    pub fn new(baseline: Decimal, first_label: impl Into<String>) -> Self {
        Self {
            baseline,
            cumulative: Decimal::ZERO,
            points: vec![EquityPoint {
                label: first_label.into(),
                equity: baseline,
                pnl: Decimal::ZERO,
            }],
        }
    }

    /// 손익 하나를 누적하여 포인트를 추가합니다.
    pub fn add_pnl(&mut self, label: impl Into<String>, pnl: Decimal) -> &mut Self {
        self.cumulative = self.cumulative.saturating_add(pnl);
        self.points.push(EquityPoint {
            label: label.into(),
            equity: self.baseline.saturating_add(self.cumulative),
            pnl: self.cumulative,
        });
        self
    }

    /// 자산 곡선을 빌드합니다.
    ///
    /// 기준점밖에 없으면 `flat_label`로 평평한 두 번째 포인트를 붙입니다.
    pub fn build(mut self, flat_label: impl Into<String>) -> EquitySeries {
        if self.points.len() == 1 {
            self.points.push(EquityPoint {
                label: flat_label.into(),
                equity: self.baseline,
                pnl: Decimal::ZERO,
            });
        }

        EquitySeries {
            baseline_equity: self.baseline,
            last_equity: self.baseline.saturating_add(self.cumulative),
            total_pnl: self.cumulative,
            points: self.points,
        }
    }
}
