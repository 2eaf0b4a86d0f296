//! 자산 곡선 분석 모듈
//!
//! # 모듈 구성
//!
//! - [`equity_curve`]: 조회 구간의 자산 곡선 계산
//! - [`charts`]: 자산 곡선 좌표 계산, 렌더링, 툴팁 hit-test
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use journal_analytics::{ChartLayout, ChartRenderer, EquitySeries, RangePreset, RangeWindow};
//! use rust_decimal_macros::dec;
//!
//! let window = RangeWindow::from_preset(RangePreset::ThreeMonths, now);
//! let series = EquitySeries::build(&entries, &window, dec!(10_000_000), now);
//!
//! let mut renderer = ChartRenderer::new(ChartLayout::default());
//! let svg = renderer.render_svg(&series.points, series.baseline_equity)?;
//! let tooltip = renderer.hit_test(320.0, None);
//! ```

pub mod charts;
pub mod equity_curve;

pub use charts::*;
pub use equity_curve::*;
