//! 키-값 저장소.
//!
//! 브라우저 로컬 스토리지처럼 문자열 키에 문자열 값을 보관합니다.
//!
//! - [`MemoryStore`]: 프로세스 메모리 (테스트, 임시 세션)
//! - [`FileStore`]: 모든 슬롯을 하나의 JSON 객체 파일로 보관

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{DataError, Result};

/// 문자열 키-값 저장소.
pub trait KeyValueStore {
    /// 키의 값을 가져옵니다. 없으면 `None`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// 키에 값을 저장합니다.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// 키를 삭제합니다. 없는 키는 무시합니다.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// JSON으로 저장된 값을 가져옵니다.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 값을 JSON으로 직렬화하여 저장합니다.
    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}

/// 메모리 저장소.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 모든 쓰기가 실패하는 저장소 (저장 공간 부족 상황 재현용).
    pub fn read_only() -> Self {
        Self {
            slots: HashMap::new(),
            read_only: true,
        }
    }

    /// 쓰기 가능 여부를 바꿉니다.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only {
            return Err(DataError::StorageError(format!(
                "store is read-only (key: {})",
                key
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.slots.remove(key);
        Ok(())
    }
}

/// JSON 파일 저장소.
///
/// 파일 전체를 `{ "키": "값", ... }` 객체로 읽어 메모리에 두고,
/// 쓰기마다 파일 전체를 다시 씁니다.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl FileStore {
    /// 저장 파일을 엽니다. 파일이 없으면 빈 저장소로 시작합니다.
    ///
    /// 내용이 문자열 값의 JSON 객체가 아니면 파일을 `<이름>.corrupt-<밀리초>`로
    /// 옮겨 두고 빈 저장소로 시작합니다. 파일을 읽을 수 없을 때만 에러입니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let slots: BTreeMap<String, String> = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&raw) {
                    Ok(slots) => slots,
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "Key-value file is corrupt, starting empty");
                        quarantine(&path);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), slots = slots.len(), "Key-value file opened");
        Ok(Self { path, slots })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.slots)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), slots = self.slots.len(), "Key-value file written");
        Ok(())
    }
}

/// 손상된 파일을 옆으로 옮깁니다. 옮기지 못하면 다음 쓰기가 덮어씁니다.
fn quarantine(path: &Path) {
    let Some(file_name) = path.file_name() else {
        return;
    };
    let mut name = file_name.to_os_string();
    name.push(format!(".corrupt-{}", Utc::now().timestamp_millis()));
    let target = path.with_file_name(name);

    match fs::rename(path, &target) {
        Ok(()) => {
            warn!(from = %path.display(), to = %target.display(), "Corrupt key-value file moved aside")
        }
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to move corrupt key-value file"),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.slots.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            // 파일에 반영되지 않은 값은 메모리에서도 되돌림
            match previous {
                Some(old) => self.slots.insert(key.to_string(), old),
                None => self.slots.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if let Some(old) = self.slots.remove(key) {
            if let Err(e) = self.flush() {
                self.slots.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }
}
