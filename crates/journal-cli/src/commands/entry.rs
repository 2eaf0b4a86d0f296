//! 매매 기록 등록/수정/삭제/조회 명령.

use anyhow::Result;
use clap::Args;

use journal_core::{EntryFields, JournalError, TradeEntry};
use journal_data::KeyValueStore;

use crate::app::{Journal, Moment, TableRow};
use crate::commands::OutputFormat;

/// 입력 폼 필드. 지정하지 않은 필드는 비워 두거나(등록) 기존 값을 유지합니다(수정).
#[derive(Debug, Clone, Default, Args)]
pub struct EntryArgs {
    /// 매매 날짜 (YYYY-MM-DD, 등록 시 생략하면 오늘)
    #[arg(short, long)]
    pub date: Option<String>,

    /// 종목
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// 평균 진입가
    #[arg(short, long)]
    pub avg_entry: Option<String>,

    /// 1차 진입가
    #[arg(long)]
    pub entry1: Option<String>,

    /// 2차 진입가
    #[arg(long)]
    pub entry2: Option<String>,

    /// 3차 진입가
    #[arg(long)]
    pub entry3: Option<String>,

    /// 수량
    #[arg(short, long)]
    pub quantity: Option<String>,

    /// 손익
    #[arg(short, long)]
    pub pnl: Option<String>,

    /// 손익률 (%)
    #[arg(long)]
    pub pnl_percent: Option<String>,

    /// 진입 근거
    #[arg(long)]
    pub reason: Option<String>,

    /// 청산 이유
    #[arg(long)]
    pub exit_reason: Option<String>,

    /// 교훈
    #[arg(long)]
    pub lesson: Option<String>,
}

impl EntryArgs {
    /// 지정된 필드만 `base` 위에 덮어씁니다.
    pub fn merged_into(self, mut base: EntryFields) -> EntryFields {
        let slots = [
            (self.date, &mut base.date),
            (self.symbol, &mut base.symbol),
            (self.avg_entry, &mut base.avg_entry),
            (self.entry1, &mut base.entry1),
            (self.entry2, &mut base.entry2),
            (self.entry3, &mut base.entry3),
            (self.quantity, &mut base.quantity),
            (self.pnl, &mut base.pnl),
            (self.pnl_percent, &mut base.pnl_percent),
            (self.reason, &mut base.reason),
            (self.exit_reason, &mut base.exit_reason),
            (self.lesson, &mut base.lesson),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
        base
    }

    pub fn into_fields(self) -> EntryFields {
        self.merged_into(EntryFields::default())
    }
}

/// 새 기록을 등록합니다.
pub fn add_entry<S: KeyValueStore>(
    journal: &mut Journal<S>,
    args: EntryArgs,
    at: Moment,
) -> Result<String> {
    let created = journal.submit_entry(args.into_fields(), at)?;
    Ok(format!("기록 등록 완료: #{} {} {}", created.id, created.date, created.symbol))
}

/// 기존 기록을 수정합니다. 지정하지 않은 필드는 기존 값을 유지합니다.
pub fn edit_entry<S: KeyValueStore>(
    journal: &mut Journal<S>,
    id: i64,
    args: EntryArgs,
) -> Result<String> {
    let existing = journal
        .entry(id)
        .ok_or_else(|| not_found(id))?
        .fields();
    let updated = journal.update_entry(id, args.merged_into(existing))?;
    Ok(format!("기록 수정 완료: #{} {} {}", updated.id, updated.date, updated.symbol))
}

/// 기록을 삭제합니다.
pub fn delete_entry<S: KeyValueStore>(journal: &mut Journal<S>, id: i64) -> Result<String> {
    let removed = journal.delete_entry(id)?;
    Ok(format!("기록 삭제 완료: #{} {} {}", removed.id, removed.date, removed.symbol))
}

/// 기록 하나의 모든 필드를 보여줍니다.
pub fn show_entry<S: KeyValueStore>(
    journal: &Journal<S>,
    id: i64,
    format: OutputFormat,
) -> Result<String> {
    let entry = journal
        .entry(id)
        .ok_or_else(|| not_found(id))?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entry)?),
        OutputFormat::Table => Ok(format_detail(entry)),
    }
}

/// 조회 기간 안의 기록을 최신순으로 나열합니다.
pub fn list_entries<S: KeyValueStore>(
    journal: &Journal<S>,
    at: Moment,
    format: OutputFormat,
) -> Result<String> {
    let rows = journal.table_rows(at);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => Ok(format_table(&rows)),
    }
}

fn not_found(id: i64) -> JournalError {
    JournalError::NotFound(format!("매매 기록 id {}", id))
}

fn format_detail(entry: &TradeEntry) -> String {
    let fields = [
        ("ID", entry.id.to_string()),
        ("날짜", entry.date.clone()),
        ("종목", entry.symbol.clone()),
        ("평균 진입가", entry.avg_entry.clone()),
        ("1차 진입가", entry.entry1.clone()),
        ("2차 진입가", entry.entry2.clone()),
        ("3차 진입가", entry.entry3.clone()),
        ("수량", entry.quantity.clone()),
        ("손익", entry.pnl.clone()),
        ("손익률", entry.pnl_percent.clone()),
        ("진입 근거", entry.reason.clone()),
        ("청산 이유", entry.exit_reason.clone()),
        ("교훈", entry.lesson.clone()),
    ];

    fields
        .iter()
        .map(|(name, value)| format!("{:<10} {}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_table(rows: &[TableRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<15} {:<10} {:<12} {:>14} {:>10} {:>14} {:>8}\n",
        "ID", "DATE", "SYMBOL", "AVG_ENTRY", "QTY", "PNL", "PNL%"
    ));
    output.push_str(&"-".repeat(89));
    output.push('\n');

    for row in rows {
        output.push_str(&format!(
            "{:<15} {:<10} {:<12} {:>14} {:>10} {:>14} {:>8}\n",
            row.id, row.date, row.symbol, row.avg_entry, row.quantity, row.pnl, row.pnl_percent
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} entries", rows.len()));
    output
}
