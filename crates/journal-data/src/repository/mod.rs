//! 페이지 단위 영구 저장소.
//!
//! - [`journal`]: 매매 기록, 예수금 설정 (1회 마이그레이션 포함)
//! - [`principles`]: 매매 원칙 메모

pub mod journal;
pub mod principles;

pub use journal::{JournalRepository, SettingsSource};
pub use principles::PrinciplesNote;
