//! 예수금과 매매 원칙 메모 명령.

use anyhow::Result;
use clap::Subcommand;

use journal_core::DecimalExt;
use journal_data::{KeyValueStore, PrinciplesNote};

use crate::app::Journal;

/// 매매 원칙 메모 하위 명령.
#[derive(Debug, Clone, Subcommand)]
pub enum PrinciplesAction {
    /// 저장된 메모 보기
    Show,
    /// 메모 저장 (앞뒤 공백 제거)
    Save {
        /// 메모 내용
        text: String,
    },
    /// 메모 삭제
    Clear,
}

/// 예수금을 보여주거나 저장합니다.
pub fn cash<S: KeyValueStore>(journal: &mut Journal<S>, value: Option<&str>) -> Result<String> {
    match value {
        Some(raw) => {
            let saved = journal.set_starting_cash(raw)?;
            Ok(format!("예수금 저장 완료: {}", saved.starting_cash.to_grouped_int()))
        }
        None => Ok(format!(
            "예수금: {}",
            journal.settings().starting_cash.to_grouped_int()
        )),
    }
}

/// 매매 원칙 메모 명령을 실행합니다.
pub fn principles<S: KeyValueStore>(
    journal: &mut Journal<S>,
    action: PrinciplesAction,
) -> Result<String> {
    match action {
        PrinciplesAction::Show => {
            let note = journal.load_principles();
            Ok(match note {
                PrinciplesNote::Saved(text) => text,
                other => other.status_message().to_string(),
            })
        }
        PrinciplesAction::Save { text } => match journal.save_principles(&text)? {
            Some(saved) => Ok(format!("원칙 메모 저장 완료 ({}자)", saved.chars().count())),
            None => Ok("변경 사항이 없어 저장하지 않았습니다.".to_string()),
        },
        PrinciplesAction::Clear => {
            journal.clear_principles()?;
            Ok("원칙 메모를 삭제했습니다.".to_string())
        }
    }
}
