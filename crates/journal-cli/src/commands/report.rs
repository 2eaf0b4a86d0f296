//! 통계, 자산 곡선 차트, 툴팁 명령.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use journal_core::DecimalExt;
use journal_data::KeyValueStore;

use crate::app::{Journal, Moment};

/// 오늘 손익과 현재 조회 기간의 누적 성과를 요약합니다.
pub fn stats<S: KeyValueStore>(journal: &Journal<S>, at: Moment) -> String {
    let today = journal.today_stats(at);
    let series = journal.compute_series(at);
    let range = journal.range();

    [
        format!("조회 기간: {} ({})", range.preset.display_name(), range.preset),
        format!("예수금: {}", journal.settings().starting_cash.to_grouped_int()),
        format!("오늘 손익: {}", today.today_pnl.to_grouped_int()),
        today.summary_line(),
        format!("기간 시작 평가금: {}", series.baseline_equity.to_grouped_int()),
        format!("기간 손익: {}", series.total_pnl.to_grouped_int()),
        format!("평가금: {}", series.last_equity.to_grouped_int()),
        format!("누적 수익률: {}", series.cumulative_return_display()),
    ]
    .join("\n")
}

/// 자산 곡선을 SVG로 그립니다. 경로가 있으면 파일로 저장하고 안내 문구를 돌려줍니다.
pub async fn chart<S: KeyValueStore>(
    journal: &mut Journal<S>,
    at: Moment,
    output: Option<&Path>,
) -> Result<String> {
    let svg = journal.render_svg(at)?;

    let Some(path) = output else {
        return Ok(svg);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, svg.as_bytes())
        .await
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    info!(path = %path.display(), "Chart written");

    Ok(format!("차트 저장 위치: {}", path.display()))
}

/// 차트의 X 좌표에 해당하는 툴팁을 보여줍니다.
pub fn hover<S: KeyValueStore>(
    journal: &mut Journal<S>,
    at: Moment,
    x: f64,
    box_width: Option<f64>,
) -> String {
    journal.render(at);
    match journal.hit_test(x, box_width) {
        Some(tip) => {
            let mut lines = tip.lines();
            lines.push(format!(
                "위치: left={:.1}, top={:.1}",
                tip.left, tip.top
            ));
            lines.join("\n")
        }
        None => "표시할 포인트가 없습니다.".to_string(),
    }
}
