//! 매매일지 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 애플리케이션 상태 ([`Journal`])
//! - 기록 등록/수정/삭제/조회 명령
//! - 통계, 자산 곡선 차트, 툴팁 명령
//! - CSV 가져오기/내보내기 명령
//! - 예수금, 매매 원칙 메모 명령

pub mod app;
pub mod commands;

pub use app::{Journal, Moment, TableRow, NO_VALID_ROWS_MESSAGE};
pub use commands::OutputFormat;
