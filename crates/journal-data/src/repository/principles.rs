//! 매매 원칙 메모.

use tracing::{error, info};

use crate::error::Result;
use crate::storage::KeyValueStore;

use super::JournalRepository;

/// 원칙 메모 불러오기 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinciplesNote {
    /// 저장된 적이 없음
    Missing,
    /// 빈 내용으로 저장됨
    Empty,
    /// 저장된 내용
    Saved(String),
}

impl PrinciplesNote {
    /// 불러온 뒤 보여줄 상태 문구.
    pub fn status_message(&self) -> &'static str {
        match self {
            PrinciplesNote::Missing => "아직 저장된 매매 원칙이 없습니다.",
            PrinciplesNote::Empty => "저장된 내용이 비어 있습니다. 원칙을 작성해 보세요.",
            PrinciplesNote::Saved(_) => "마지막 저장된 매매 원칙을 불러왔습니다.",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            PrinciplesNote::Saved(text) => text,
            _ => "",
        }
    }
}

impl<S: KeyValueStore> JournalRepository<S> {
    /// 원칙 메모를 불러옵니다. 읽기에 실패하면 저장된 적 없는 것으로 취급합니다.
    pub fn load_principles(&self) -> PrinciplesNote {
        match self.store().get(&self.keys().principles) {
            Ok(None) => PrinciplesNote::Missing,
            Ok(Some(text)) if text.trim().is_empty() => PrinciplesNote::Empty,
            Ok(Some(text)) => PrinciplesNote::Saved(text),
            Err(e) => {
                error!(error = %e, "Failed to read principles");
                PrinciplesNote::Missing
            }
        }
    }

    /// 앞뒤 공백을 제거한 원칙 메모를 저장하고, 저장된 내용을 반환합니다.
    pub fn save_principles(&mut self, text: &str) -> Result<String> {
        let trimmed = text.trim().to_string();
        let key = self.keys().principles.clone();
        self.store_mut().set(&key, &trimmed)?;
        info!(chars = trimmed.chars().count(), "Principles saved");
        Ok(trimmed)
    }

    /// 저장된 내용과 다를 때만 저장합니다. 저장했으면 `true`.
    pub fn save_principles_if_changed(&mut self, text: &str) -> Result<bool> {
        let current = text.trim();
        let stored = self.store().get(&self.keys().principles)?.unwrap_or_default();
        if current == stored {
            return Ok(false);
        }
        self.save_principles(current)?;
        Ok(true)
    }

    /// 원칙 메모 슬롯을 삭제합니다.
    pub fn clear_principles(&mut self) -> Result<()> {
        let key = self.keys().principles.clone();
        self.store_mut().remove(&key)?;
        info!("Principles cleared");
        Ok(())
    }
}
