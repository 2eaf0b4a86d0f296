//! 가져온 CSV 행을 매매 기록으로 정규화.
//!
//! 영문/한글 헤더 별칭을 표준 필드로 모으고, 필수 값(날짜, 평균 진입가, 수량)이
//! 없는 행은 버립니다.

use rust_decimal::prelude::*;
use tracing::debug;

use journal_core::{parse_number, utc_midnight_millis, EntryFields, TradeEntry};

use super::parser::CsvRow;

/// 표준 필드별 헤더 별칭. 앞에 있는 별칭이 우선합니다.
pub const FIELD_ALIASES: [(&str, &[&str]); 12] = [
    ("date", &["date", "날짜"]),
    ("symbol", &["symbol", "종목"]),
    ("avgEntry", &["avgEntry", "평균진입가", "평균 진입가"]),
    ("entry1", &["entry1", "1차진입가", "1차 진입가"]),
    ("entry2", &["entry2", "2차진입가", "2차 진입가"]),
    ("entry3", &["entry3", "3차진입가", "3차 진입가"]),
    ("quantity", &["quantity", "수량"]),
    ("pnl", &["pnl", "손익"]),
    ("pnlPercent", &["pnlPercent", "손익률", "pnl%"]),
    ("reason", &["reason", "진입근거"]),
    ("exitReason", &["exitReason", "청산이유"]),
    ("lesson", &["lesson", "교훈"]),
];

/// 표준 필드의 별칭 목록.
fn aliases(field: &str) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// 헤더에 존재하는 첫 별칭의 값. 값이 비어 있어도 그 별칭을 씁니다.
fn pick(row: &CsvRow, field: &str) -> String {
    aliases(field)
        .iter()
        .find_map(|alias| row.get(*alias))
        .cloned()
        .unwrap_or_default()
}

/// 정수로 해석되는 ID/타임스탬프 값. 비었거나 정수가 아니면 `None`.
fn integer_cell(row: &CsvRow, key: &str) -> Option<i64> {
    let raw = row.get(key)?;
    parse_number(raw)
        .filter(|n| n.fract().is_zero())
        .and_then(|n| n.to_i64())
}

/// CSV 행 하나를 입력 필드 묶음으로 모읍니다.
pub fn fields_from_row(row: &CsvRow) -> EntryFields {
    EntryFields {
        date: pick(row, "date"),
        symbol: pick(row, "symbol"),
        avg_entry: pick(row, "avgEntry"),
        entry1: pick(row, "entry1"),
        entry2: pick(row, "entry2"),
        entry3: pick(row, "entry3"),
        quantity: pick(row, "quantity"),
        pnl: pick(row, "pnl"),
        pnl_percent: pick(row, "pnlPercent"),
        reason: pick(row, "reason"),
        exit_reason: pick(row, "exitReason"),
        lesson: pick(row, "lesson"),
    }
}

/// 행 목록을 매매 기록으로 정규화합니다.
///
/// - 날짜, 평균 진입가, 수량 중 하나라도 비면 버림
/// - `id`가 없으면 `now + 행 번호`
/// - `createdAt`이 없으면 날짜의 UTC 자정, 날짜 해석이 안 되면 `now + 행 번호`
/// - 결과는 `createdAt` 오름차순 (같은 값은 원래 순서)
pub fn normalize_rows(rows: &[CsvRow], now_millis: i64) -> Vec<TradeEntry> {
    let mut out: Vec<TradeEntry> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let fields = fields_from_row(row);
            if fields.date.is_empty() || fields.avg_entry.is_empty() || fields.quantity.is_empty() {
                debug!(row = idx, "Import row without required fields dropped");
                return None;
            }

            let fallback = now_millis + idx as i64;
            let id = integer_cell(row, "id").unwrap_or(fallback);
            let created_at = integer_cell(row, "createdAt")
                .or_else(|| utc_midnight_millis(&fields.date))
                .unwrap_or(fallback);

            Some(TradeEntry::from_fields(id, created_at, fields))
        })
        .collect();

    out.sort_by_key(|e| e.created_at);
    out
}
