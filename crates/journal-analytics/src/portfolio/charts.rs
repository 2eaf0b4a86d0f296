//! 자산 곡선 차트
//!
//! 자산 곡선 포인트를 고정 크기 캔버스의 픽셀 좌표로 변환하고,
//! plotters 백엔드에 기준선과 곡선, 눈금 레이블을 그립니다.
//!
//! # 구성
//!
//! - [`ChartGeometry`]: 순수 좌표 계산 (그리기 없음)
//! - [`ChartRenderer`]: 그리기 + 마지막 좌표 보관 (툴팁 hit-test용)
//! - [`Tooltip`]: 마우스 X 좌표에 해당하는 포인트 정보와 툴팁 박스 위치
//!
//! X축은 날짜 간격과 무관하게 포인트 인덱스 기준으로 균등 배치합니다.

use plotters::coord::Shift;
use plotters::prelude::*;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use journal_core::{percent_of, ChartConfig, DecimalExt, JournalError, JournalResult};

use super::equity_curve::EquityPoint;

/// 툴팁 박스 너비를 알 수 없을 때 사용하는 기본값 (픽셀).
pub const DEFAULT_TOOLTIP_WIDTH: f64 = 150.0;

/// 커서와 툴팁 박스 사이 간격 (픽셀).
const TOOLTIP_GAP: f64 = 12.0;

/// 눈금 레이블 X 위치 (픽셀).
const TICK_X: f64 = 4.0;

const BASELINE_COLOR: RGBColor = RGBColor(148, 163, 184);
const CURVE_COLOR: RGBColor = RGBColor(59, 130, 246);
const TICK_COLOR: RGBColor = RGBColor(0x94, 0xa3, 0xb8);

/// 캔버스 여백 (픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for ChartMargins {
    fn default() -> Self {
        Self {
            left: 40.0,
            right: 10.0,
            top: 10.0,
            bottom: 30.0,
        }
    }
}

/// 캔버스 크기와 여백
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margins: ChartMargins,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self::new(800.0, 260.0)
    }
}

impl From<&ChartConfig> for ChartLayout {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: f64::from(config.width),
            height: f64::from(config.height),
            margins: ChartMargins {
                left: f64::from(config.margin_left),
                right: f64::from(config.margin_right),
                top: f64::from(config.margin_top),
                bottom: f64::from(config.margin_bottom),
            },
        }
    }
}

impl ChartLayout {
    /// 기본 여백을 가진 레이아웃을 생성합니다.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: ChartMargins::default(),
        }
    }

    /// 여백을 뺀 그리기 영역 너비
    pub fn inner_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    /// 여백을 뺀 그리기 영역 높이
    pub fn inner_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }
}

/// 픽셀 좌표
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Y축 눈금 레이블
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLabel {
    /// 천 단위 구분된 정수 문자열
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// 한 번의 렌더링에 대한 좌표 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub layout: ChartLayout,
    /// 원본 포인트
    pub points: Vec<EquityPoint>,
    /// 포인트별 픽셀 좌표
    pub coords: Vec<PlotPoint>,
    pub min_value: Decimal,
    pub max_value: Decimal,
    /// `max - min`, 0이면 1
    pub span: Decimal,
    pub baseline_value: Decimal,
    /// 기준선 Y 좌표
    pub baseline_y: f64,
    /// 최대값, 기준값, 최소값 순의 눈금 레이블
    pub ticks: Vec<TickLabel>,
}

impl ChartGeometry {
    /// 포인트와 기준 자산으로 좌표를 계산합니다.
    ///
    /// 포인트가 없으면 값 범위를 `[baseline, baseline]`으로 둡니다.
    pub fn compute(layout: ChartLayout, points: &[EquityPoint], baseline: Decimal) -> Self {
        let (min_value, max_value) = if points.is_empty() {
            (baseline, baseline)
        } else {
            points.iter().fold((Decimal::MAX, Decimal::MIN), |(lo, hi), p| {
                (lo.min(p.equity), hi.max(p.equity))
            })
        };

        let span = match max_value.saturating_sub(min_value) {
            s if s.is_zero() => Decimal::ONE,
            s => s,
        };

        let mut geometry = Self {
            layout,
            points: points.to_vec(),
            coords: Vec::with_capacity(points.len()),
            min_value,
            max_value,
            span,
            baseline_value: baseline,
            baseline_y: 0.0,
            ticks: Vec::with_capacity(3),
        };

        geometry.baseline_y = geometry.y_for(baseline);
        geometry.coords = (0..points.len())
            .map(|i| PlotPoint {
                x: geometry.x_for(i),
                y: geometry.y_for(points[i].equity),
            })
            .collect();
        geometry.ticks = [max_value, baseline, min_value]
            .into_iter()
            .map(|v| TickLabel {
                text: v.to_grouped_int(),
                x: TICK_X,
                y: geometry.y_for(v) + 3.0,
            })
            .collect();

        geometry
    }

    /// 인덱스의 X 좌표
    pub fn x_for(&self, index: usize) -> f64 {
        let denom = self.points.len().saturating_sub(1).max(1) as f64;
        self.layout.margins.left + (index as f64 / denom) * self.layout.inner_width()
    }

    /// 값의 Y 좌표
    pub fn y_for(&self, value: Decimal) -> f64 {
        let ratio = value
            .saturating_sub(self.min_value)
            .checked_div(self.span)
            .and_then(|r| r.to_f64())
            .unwrap_or(0.0);
        self.layout.height - self.layout.margins.bottom - ratio * self.layout.inner_height()
    }

    /// 마우스 X 좌표에 가장 가까운 포인트의 툴팁을 계산합니다.
    ///
    /// `box_width`는 툴팁 박스의 실제 너비이며, 모르면 [`DEFAULT_TOOLTIP_WIDTH`]를 씁니다.
    /// 포인트가 없으면 `None`입니다.
    pub fn hit_test(&self, x: f64, box_width: Option<f64>) -> Option<Tooltip> {
        let last = self.points.len().checked_sub(1)?;
        let layout = &self.layout;

        let t = ((x - layout.margins.left) / layout.inner_width()).clamp(0.0, 1.0);
        let t = if t.is_nan() { 0.0 } else { t };
        let index = ((t * last as f64).round() as usize).min(last);

        let point = &self.points[index];
        let anchor = self.coords[index];
        let base = self.points[0].equity;
        let cumulative_pnl = point.equity.saturating_sub(base);
        let return_pct = percent_of(cumulative_pnl, base).unwrap_or(Decimal::ZERO);

        let box_width = box_width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_TOOLTIP_WIDTH);
        let left = if x > layout.width / 2.0 {
            anchor.x - box_width - TOOLTIP_GAP
        } else {
            anchor.x + TOOLTIP_GAP
        };
        let left = left.min(layout.width - box_width).max(0.0);

        Some(Tooltip {
            index,
            label: point.label.clone(),
            cumulative_pnl,
            return_pct,
            equity: point.equity,
            anchor,
            left,
            top: anchor.y - 10.0,
        })
    }
}

/// 툴팁 내용과 위치
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    /// 선택된 포인트 인덱스
    pub index: usize,
    pub label: String,
    /// 첫 포인트 대비 누적 손익
    pub cumulative_pnl: Decimal,
    /// 첫 포인트 대비 수익률 (%)
    pub return_pct: Decimal,
    /// 평가금
    pub equity: Decimal,
    /// 포인트의 픽셀 좌표
    pub anchor: PlotPoint,
    /// 박스 왼쪽 X
    pub left: f64,
    /// 박스 위쪽 Y
    pub top: f64,
}

impl Tooltip {
    /// 툴팁 표시 줄 (레이블, 누적 손익, 누적 수익률, 평가금).
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            format!("누적 손익: {}", self.cumulative_pnl.to_grouped_int()),
            format!("누적 수익률: {}", self.return_pct.to_percent_display()),
            format!("평가금: {}", self.equity.to_grouped_int()),
        ]
    }
}

/// 자산 곡선 렌더러
///
/// 마지막으로 그린 좌표를 보관하여 hit-test에 사용합니다.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    layout: ChartLayout,
    last: Option<ChartGeometry>,
}

impl ChartRenderer {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout, last: None }
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// 마지막 렌더링 좌표
    pub fn last_geometry(&self) -> Option<&ChartGeometry> {
        self.last.as_ref()
    }

    /// 좌표만 계산하고 보관합니다.
    pub fn render(&mut self, points: &[EquityPoint], baseline: Decimal) -> &ChartGeometry {
        let geometry = ChartGeometry::compute(self.layout, points, baseline);
        debug!(
            points = geometry.points.len(),
            min = %geometry.min_value,
            max = %geometry.max_value,
            "Chart geometry computed"
        );
        self.last.insert(geometry)
    }

    /// 좌표를 계산하고 주어진 드로잉 영역에 그립니다.
    pub fn draw<DB: DrawingBackend>(
        &mut self,
        area: &DrawingArea<DB, Shift>,
        points: &[EquityPoint],
        baseline: Decimal,
    ) -> JournalResult<&ChartGeometry> {
        let geometry = ChartGeometry::compute(self.layout, points, baseline);
        paint(area, &geometry)?;
        Ok(&*self.last.insert(geometry))
    }

    /// SVG 문자열로 렌더링합니다.
    pub fn render_svg(&mut self, points: &[EquityPoint], baseline: Decimal) -> JournalResult<String> {
        let size = (self.layout.width as u32, self.layout.height as u32);
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            self.draw(&root, points, baseline)?;
            root.present().map_err(render_error)?;
        }
        Ok(svg)
    }

    /// 마지막 렌더링 기준으로 툴팁을 계산합니다. 렌더링 전이면 `None`.
    pub fn hit_test(&self, x: f64, box_width: Option<f64>) -> Option<Tooltip> {
        self.last.as_ref()?.hit_test(x, box_width)
    }
}

fn paint<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    geometry: &ChartGeometry,
) -> JournalResult<()> {
    let layout = &geometry.layout;

    let baseline_y = geometry.baseline_y.round() as i32;
    area.draw(&PathElement::new(
        vec![
            (layout.margins.left.round() as i32, baseline_y),
            ((layout.width - layout.margins.right).round() as i32, baseline_y),
        ],
        BASELINE_COLOR.mix(0.45).stroke_width(1),
    ))
    .map_err(render_error)?;

    let curve: Vec<(i32, i32)> = geometry
        .coords
        .iter()
        .map(|p| (p.x.round() as i32, p.y.round() as i32))
        .collect();
    area.draw(&PathElement::new(
        curve,
        CURVE_COLOR.mix(0.9).stroke_width(2),
    ))
    .map_err(render_error)?;

    let font = ("sans-serif", 10).into_font().color(&TICK_COLOR);
    for tick in &geometry.ticks {
        area.draw(&Text::new(
            tick.text.clone(),
            (tick.x.round() as i32, tick.y.round() as i32),
            font.clone(),
        ))
        .map_err(render_error)?;
    }

    Ok(())
}

fn render_error<E: std::error::Error + Send + Sync>(
    err: DrawingAreaErrorKind<E>,
) -> JournalError {
    JournalError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn point(label: &str, equity: Decimal) -> EquityPoint {
        EquityPoint {
            label: label.to_string(),
            equity,
            pnl: Decimal::ZERO,
        }
    }

    fn sample() -> Vec<EquityPoint> {
        vec![
            point("2024-01-01", dec!(1000)),
            point("2024-01-02", dec!(1200)),
            point("2024-01-03", dec!(800)),
        ]
    }

    #[test]
    fn test_inner_size() {
        let layout = ChartLayout::new(800.0, 260.0);
        assert_eq!(layout.inner_width(), 750.0);
        assert_eq!(layout.inner_height(), 220.0);
    }

    #[test]
    fn test_geometry_coordinates() {
        let geometry = ChartGeometry::compute(ChartLayout::new(800.0, 260.0), &sample(), dec!(1000));

        assert_eq!(geometry.min_value, dec!(800));
        assert_eq!(geometry.max_value, dec!(1200));
        assert_eq!(geometry.span, dec!(400));

        // x: 40, 415, 790
        assert_eq!(geometry.coords[0].x, 40.0);
        assert_eq!(geometry.coords[1].x, 415.0);
        assert_eq!(geometry.coords[2].x, 790.0);

        // y: 최대값은 상단 여백, 최소값은 하단 여백 위치
        assert_eq!(geometry.coords[1].y, 10.0);
        assert_eq!(geometry.coords[2].y, 230.0);
        assert_eq!(geometry.baseline_y, 120.0);
    }

    #[test]
    fn test_ticks() {
        let geometry = ChartGeometry::compute(ChartLayout::new(800.0, 260.0), &sample(), dec!(1000));
        let texts: Vec<_> = geometry.ticks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["1,200", "1,000", "800"]);
        assert_eq!(geometry.ticks[0].x, 4.0);
        assert_eq!(geometry.ticks[0].y, 13.0);
        assert_eq!(geometry.ticks[2].y, 233.0);
    }

    #[test]
    fn test_flat_series_uses_unit_span() {
        let points = vec![point("a", dec!(500)), point("b", dec!(500))];
        let geometry = ChartGeometry::compute(ChartLayout::new(800.0, 260.0), &points, dec!(500));

        assert_eq!(geometry.span, Decimal::ONE);
        assert_eq!(geometry.coords[0].y, 230.0);
        assert_eq!(geometry.coords[1].y, 230.0);
    }

    #[test]
    fn test_empty_points_fall_back_to_baseline() {
        let geometry = ChartGeometry::compute(ChartLayout::default(), &[], dec!(700));
        assert_eq!(geometry.min_value, dec!(700));
        assert_eq!(geometry.max_value, dec!(700));
        assert!(geometry.coords.is_empty());
        assert!(geometry.hit_test(100.0, None).is_none());
    }

    #[test]
    fn test_hit_test_index_and_values() {
        let geometry = ChartGeometry::compute(ChartLayout::new(800.0, 260.0), &sample(), dec!(1000));

        let tip = geometry.hit_test(420.0, None).unwrap();
        assert_eq!(tip.index, 1);
        assert_eq!(tip.label, "2024-01-02");
        assert_eq!(tip.cumulative_pnl, dec!(200));
        assert_eq!(tip.return_pct, dec!(20));
        assert_eq!(tip.equity, dec!(1200));
        assert_eq!(tip.top, 0.0);

        // 범위를 벗어난 좌표는 양 끝으로 고정
        assert_eq!(geometry.hit_test(-50.0, None).unwrap().index, 0);
        assert_eq!(geometry.hit_test(5000.0, None).unwrap().index, 2);
    }

    #[test]
    fn test_hit_test_box_placement() {
        let geometry = ChartGeometry::compute(ChartLayout::new(800.0, 260.0), &sample(), dec!(1000));

        // 왼쪽 절반: 포인트 오른쪽에 배치
        let left_half = geometry.hit_test(30.0, None).unwrap();
        assert_eq!(left_half.left, 52.0);

        // 오른쪽 절반: 포인트 왼쪽에 배치
        let right_half = geometry.hit_test(790.0, Some(200.0)).unwrap();
        assert_eq!(right_half.left, 790.0 - 200.0 - 12.0);

        // 좁은 캔버스에서는 왼쪽 끝으로 고정
        let narrow = ChartGeometry::compute(ChartLayout::new(100.0, 100.0), &sample(), dec!(1000));
        let clamped = narrow.hit_test(80.0, Some(150.0)).unwrap();
        assert_eq!(clamped.left, 0.0);
    }

    #[test]
    fn test_hit_test_non_positive_base() {
        let points = vec![point("a", dec!(-100)), point("b", dec!(50))];
        let geometry = ChartGeometry::compute(ChartLayout::default(), &points, dec!(-100));
        let tip = geometry.hit_test(790.0, None).unwrap();
        assert_eq!(tip.cumulative_pnl, dec!(150));
        assert_eq!(tip.return_pct, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_values_stay_in_range() {
        let low = Decimal::from_scientific("-5e28").unwrap();
        let points = vec![point("a", low), point("b", Decimal::MAX)];
        let geometry = ChartGeometry::compute(ChartLayout::new(800.0, 260.0), &points, low);

        assert_eq!(geometry.span, Decimal::MAX);
        assert!(geometry
            .coords
            .iter()
            .all(|p| p.y.is_finite() && (10.0..=230.0).contains(&p.y)));

        let tip = geometry.hit_test(790.0, None).unwrap();
        assert_eq!(tip.cumulative_pnl, Decimal::MAX);
        assert_eq!(tip.return_pct, Decimal::ZERO);
        assert_eq!(tip.lines().len(), 4);

        let points = vec![point("a", dec!(1)), point("b", Decimal::MAX)];
        let geometry = ChartGeometry::compute(ChartLayout::default(), &points, dec!(1));
        let tip = geometry.hit_test(790.0, None).unwrap();
        // MAX / 1 * 100은 표현할 수 없어 0
        assert_eq!(tip.return_pct, Decimal::ZERO);
        assert!(ChartRenderer::default().render_svg(&points, dec!(1)).is_ok());
    }

    #[test]
    fn test_tooltip_lines() {
        let geometry = ChartGeometry::compute(ChartLayout::default(), &sample(), dec!(1000));
        let lines = geometry.hit_test(790.0, None).unwrap().lines();
        assert_eq!(
            lines,
            [
                "2024-01-03",
                "누적 손익: -200",
                "누적 수익률: -20.00%",
                "평가금: 800",
            ]
        );
    }

    #[test]
    fn test_renderer_keeps_last_geometry() {
        let mut renderer = ChartRenderer::new(ChartLayout::default());
        assert!(renderer.hit_test(100.0, None).is_none());

        renderer.render(&sample(), dec!(1000));
        assert_eq!(renderer.last_geometry().unwrap().points.len(), 3);
        assert!(renderer.hit_test(100.0, None).is_some());
    }

    #[test]
    fn test_render_svg() {
        let mut renderer = ChartRenderer::new(ChartLayout::default());
        let svg = renderer.render_svg(&sample(), dec!(1000)).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("1,200"));
        assert!(renderer.last_geometry().is_some());
    }
}
