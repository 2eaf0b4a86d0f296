//! 매매 기록 CSV 내보내기.

use chrono::NaiveDate;

use journal_core::{format_iso_date, TradeEntry};

/// 내보내기 열 순서.
pub const CSV_HEADER: [&str; 14] = [
    "id",
    "createdAt",
    "date",
    "symbol",
    "avgEntry",
    "entry1",
    "entry2",
    "entry3",
    "quantity",
    "pnl",
    "pnlPercent",
    "reason",
    "exitReason",
    "lesson",
];

/// 행 구분자.
pub const LINE_BREAK: &str = "\r\n";

/// 내보내기 파일 이름 (`stock_journal_YYYY-MM-DD.csv`).
pub fn export_file_name(today: NaiveDate) -> String {
    format!("stock_journal_{}.csv", format_iso_date(today))
}

/// 기록을 CSV 텍스트로 직렬화합니다.
///
/// 헤더는 따옴표 없이, 데이터 셀은 모두 따옴표로 감쌉니다.
pub fn write_csv(entries: &[TradeEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for entry in entries {
        let row: Vec<String> = CSV_HEADER
            .iter()
            .map(|column| quote(&column_value(entry, column)))
            .collect();
        lines.push(row.join(","));
    }

    lines.join(LINE_BREAK)
}

fn column_value(entry: &TradeEntry, column: &str) -> String {
    match column {
        "id" => entry.id.to_string(),
        "createdAt" => entry.created_at.to_string(),
        "date" => entry.date.clone(),
        "symbol" => entry.symbol.clone(),
        "avgEntry" => entry.avg_entry.clone(),
        "entry1" => entry.entry1.clone(),
        "entry2" => entry.entry2.clone(),
        "entry3" => entry.entry3.clone(),
        "quantity" => entry.quantity.clone(),
        "pnl" => entry.pnl.clone(),
        "pnlPercent" => entry.pnl_percent.clone(),
        "reason" => entry.reason.clone(),
        "exitReason" => entry.exit_reason.clone(),
        "lesson" => entry.lesson.clone(),
        _ => String::new(),
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
