//! 데이터 관리 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 키-값 저장소 (메모리, JSON 파일)
//! - 페이지 단위 저장 슬롯과 예수금 설정 마이그레이션
//! - 매매 원칙 메모
//! - 메모리 상의 매매 기록 저장소
//! - CSV 가져오기/내보내기

pub mod csv;
pub mod error;
pub mod record_store;
pub mod repository;
pub mod storage;

pub use error::{DataError, Result};
pub use record_store::{newest_first, EntryStore, ImportMode};
pub use repository::{JournalRepository, PrinciplesNote, SettingsSource};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StorageKeys, DEFAULT_PAGE_ID, LEGACY_SETTINGS_KEY,
};
