//! CSV 가져오기/내보내기.
//!
//! - [`parser`]: 텍스트 → 헤더 기준 행
//! - [`normalize`]: 행 → 매매 기록 (영문/한글 헤더 별칭)
//! - [`writer`]: 매매 기록 → 텍스트

pub mod normalize;
pub mod parser;
pub mod writer;

pub use normalize::{fields_from_row, normalize_rows, FIELD_ALIASES};
pub use parser::{parse_csv, split_records, CsvRow};
pub use writer::{export_file_name, write_csv, CSV_HEADER, LINE_BREAK};

use journal_core::TradeEntry;

/// CSV 텍스트를 곧바로 매매 기록으로 읽습니다.
pub fn import_entries(text: &str, now_millis: i64) -> Vec<TradeEntry> {
    normalize_rows(&parse_csv(text), now_millis)
}
