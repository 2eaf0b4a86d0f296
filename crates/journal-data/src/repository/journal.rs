//! 매매 기록과 예수금 설정의 영구 저장.
//!
//! 읽기 실패는 로그를 남기고 빈 목록/기본 설정으로 대체하며,
//! 쓰기 실패만 호출자에게 전달합니다.

use serde_json::Value;
use tracing::{error, info, warn};

use journal_core::{Settings, TradeEntry};

use crate::error::{DataError, Result};
use crate::storage::{KeyValueStore, StorageKeys};

/// 마이그레이션 완료 플래그 값.
const MIGRATED_FLAG_VALUE: &str = "1";

/// 설정을 어디서 불러왔는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    /// 페이지 설정 슬롯
    Stored,
    /// 이전 전역 설정 키에서 옮겨옴
    Migrated,
    /// 저장된 값이 없어 기본값 사용
    Default,
}

/// 페이지 단위 매매일지 저장소.
#[derive(Debug, Clone)]
pub struct JournalRepository<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> JournalRepository<S> {
    pub fn new(store: S, page_id: &str) -> Self {
        Self {
            store,
            keys: StorageKeys::for_page(page_id),
        }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // =========================================================================
    // 매매 기록
    // =========================================================================

    /// 저장된 기록을 불러옵니다.
    ///
    /// 슬롯이 없거나 JSON 배열이 아니면 빈 목록입니다.
    /// 배열 안에서 해석할 수 없는 항목은 건너뜁니다.
    pub fn load_entries(&self) -> Vec<TradeEntry> {
        let items = match self.read_entry_items() {
            Ok(items) => items,
            Err(DataError::InvalidData(msg)) => {
                warn!(key = %self.keys.entries, reason = %msg, "Stored entries are not an array, starting empty");
                return Vec::new();
            }
            Err(e) => {
                error!(key = %self.keys.entries, error = %e, "Failed to read stored entries");
                return Vec::new();
            }
        };

        let total = items.len();
        let entries: Vec<TradeEntry> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed stored entry");
                    None
                }
            })
            .collect();

        info!(loaded = entries.len(), skipped = total - entries.len(), "Entries loaded");
        entries
    }

    fn read_entry_items(&self) -> Result<Vec<Value>> {
        match self.store.get_json::<Value>(&self.keys.entries)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(DataError::InvalidData(format!(
                "expected array, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// 기록 전체를 저장합니다.
    pub fn save_entries(&mut self, entries: &[TradeEntry]) -> Result<()> {
        let key = self.keys.entries.clone();
        self.store.set_json(&key, entries)
    }

    // =========================================================================
    // 예수금 설정
    // =========================================================================

    /// 설정을 불러옵니다.
    ///
    /// 페이지 설정이 없으면 한 번만 이전 전역 설정 키를 확인해 옮겨오고,
    /// 결과와 상관없이 마이그레이션 플래그를 남깁니다.
    pub fn load_settings(&mut self, default: Settings) -> (Settings, SettingsSource) {
        if let Some(settings) = self.read_settings(&self.keys.settings) {
            return (settings, SettingsSource::Stored);
        }

        if self.is_migrated() {
            return (default, SettingsSource::Default);
        }

        let legacy_key = self.keys.legacy_settings();
        let mut result = (default, SettingsSource::Default);
        if let Some(legacy) = self.read_settings(legacy_key) {
            match self.save_settings(&legacy) {
                Ok(()) => info!(
                    starting_cash = %legacy.starting_cash,
                    "Settings migrated from legacy key"
                ),
                Err(e) => warn!(error = %e, "Failed to write migrated settings"),
            }
            result = (legacy, SettingsSource::Migrated);
        }

        let flag_key = self.keys.migrated_flag.clone();
        if let Err(e) = self.store.set(&flag_key, MIGRATED_FLAG_VALUE) {
            warn!(error = %e, "Failed to set settings migration flag");
        }

        result
    }

    /// 설정을 저장합니다.
    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        let key = self.keys.settings.clone();
        self.store.set_json(&key, &settings.to_stored())
    }

    fn is_migrated(&self) -> bool {
        match self.store.get(&self.keys.migrated_flag) {
            Ok(flag) => flag.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read settings migration flag");
                false
            }
        }
    }

    fn read_settings(&self, key: &str) -> Option<Settings> {
        match self.store.get_json::<Value>(key) {
            Ok(value) => Settings::from_stored(&value?),
            Err(e @ DataError::SerializationError(_)) => {
                warn!(key, error = %e, "Failed to parse stored settings");
                None
            }
            Err(e) => {
                error!(key, error = %e, "Failed to read settings");
                None
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
