//! CSV 가져오기/내보내기 명령.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use journal_data::{ImportMode, KeyValueStore};

use crate::app::{Journal, Moment};

/// CSV 파일을 읽어 기록에 반영합니다.
pub async fn import_file<S: KeyValueStore>(
    journal: &mut Journal<S>,
    path: &Path,
    mode: ImportMode,
    at: Moment,
) -> Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    let count = journal.import_csv(&text, mode, at)?;
    info!(count, ?mode, path = %path.display(), "CSV imported");

    let verb = match mode {
        ImportMode::Merge => "병합",
        ImportMode::Replace => "대체",
    };
    Ok(format!("CSV 가져오기 완료 ({}): {}건", verb, count))
}

/// 전체 기록을 CSV 파일로 내보냅니다.
///
/// 경로를 생략하면 현재 디렉터리에 `stock_journal_YYYY-MM-DD.csv`로 저장합니다.
pub async fn export_file<S: KeyValueStore>(
    journal: &Journal<S>,
    output: Option<PathBuf>,
    at: Moment,
) -> Result<String> {
    let path = output.unwrap_or_else(|| PathBuf::from(journal.export_file_name(at)));
    let text = journal.export_csv();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(&path, text.as_bytes())
        .await
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    info!(entries = journal.entries().len(), path = %path.display(), "CSV exported");

    Ok(format!(
        "CSV 내보내기 완료: {}건\n저장 위치: {}",
        journal.entries().len(),
        path.display()
    ))
}
