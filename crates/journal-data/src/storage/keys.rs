//! 페이지별 저장 키.

/// 네임스페이스 이전에 쓰던 설정 키 (마이그레이션 시에만 읽음).
pub const LEGACY_SETTINGS_KEY: &str = "tradeJournalSettings_v1";

/// 기본 페이지 식별자.
pub const DEFAULT_PAGE_ID: &str = "stock";

/// `tj:<page>:*` 형식의 저장 키 묶음.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub entries: String,
    pub principles: String,
    pub settings: String,
    pub migrated_flag: String,
}

impl StorageKeys {
    pub fn for_page(page_id: &str) -> Self {
        let slot = |name: &str| format!("tj:{}:{}", page_id, name);
        Self {
            entries: slot("entries_v1"),
            principles: slot("principles_v1"),
            settings: slot("settings_v1"),
            migrated_flag: slot("settings_migrated_v1"),
        }
    }

    pub fn legacy_settings(&self) -> &'static str {
        LEGACY_SETTINGS_KEY
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::for_page(DEFAULT_PAGE_ID)
    }
}
