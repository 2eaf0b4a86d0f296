//! 매매일지 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 조회 기간 프리셋 계산
//! - 예수금 기준 자산 곡선
//! - 오늘 손익 통계
//! - 자산 곡선 차트 렌더링과 툴팁 hit-test
//!
//! # Re-exports
//!
//! - [`range`]: 조회 기간 (RangePreset, RangeWindow)
//! - [`portfolio`]: 자산 곡선과 차트 (EquitySeries, ChartRenderer 등)
//! - [`daily`]: 오늘 손익 통계 (TodayStats)

pub mod daily;
pub mod portfolio;
pub mod range;

pub use daily::{daily_pnl, TodayStats};
pub use portfolio::charts::{
    ChartGeometry, ChartLayout, ChartMargins, ChartRenderer, PlotPoint, TickLabel, Tooltip,
    DEFAULT_TOOLTIP_WIDTH,
};
pub use portfolio::equity_curve::{EquityPoint, EquitySeries, EquitySeriesBuilder, START_LABEL};
pub use range::{RangePreset, RangeWindow};
