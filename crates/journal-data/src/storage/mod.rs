//! 저장소 모듈.

pub mod keys;
pub mod kv;

pub use keys::{StorageKeys, DEFAULT_PAGE_ID, LEGACY_SETTINGS_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
