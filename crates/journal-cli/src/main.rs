//! 주식 매매일지 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기록 등록 (날짜 생략 시 오늘)
//! journal add -s 삼성전자 -a 71000 -q 10 -p 35000 --reason "눌림목"
//!
//! # 최근 1개월 기록 보기
//! journal --range 1M list
//!
//! # 자산 곡선 SVG 저장
//! journal --range 3M chart -o out/equity.svg
//!
//! # CSV 가져오기 (기존 기록 대체)
//! journal import trades.csv --replace
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use journal_analytics::RangePreset;
use journal_cli::commands::entry::{self, EntryArgs};
use journal_cli::commands::settings::{self, PrinciplesAction};
use journal_cli::commands::{csv, report};
use journal_cli::{Journal, Moment, OutputFormat};
use journal_core::{init_logging, AppConfig, JournalError, LogConfig, DEFAULT_CONFIG_PATH};
use journal_data::{FileStore, ImportMode, KeyValueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Stock trade journal - 매매 기록과 자산 곡선 관리", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 조회 기간 (ALL, WEEK, 1M, 3M, 6M, 1Y)
    #[arg(short, long, global = true, default_value = "ALL")]
    range: RangePreset,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 매매 기록 등록
    Add {
        #[command(flatten)]
        fields: EntryArgs,
    },

    /// 매매 기록 수정 (지정한 필드만 변경)
    Edit {
        /// 기록 ID
        id: i64,

        #[command(flatten)]
        fields: EntryArgs,
    },

    /// 매매 기록 삭제
    Delete {
        /// 기록 ID
        id: i64,
    },

    /// 매매 기록 상세 보기
    Show {
        /// 기록 ID
        id: i64,

        /// 출력 형식
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 조회 기간의 매매 기록 목록
    List {
        /// 출력 형식
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 오늘 손익과 기간 성과 요약
    Stats,

    /// 자산 곡선 SVG 렌더링
    Chart {
        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 차트 X 좌표의 툴팁 보기
    Hover {
        /// 마우스 X 좌표 (픽셀)
        #[arg(short)]
        x: f64,

        /// 툴팁 박스 너비 (픽셀)
        #[arg(long)]
        box_width: Option<f64>,
    },

    /// CSV 가져오기 (기본: 병합)
    Import {
        /// CSV 파일 경로
        file: PathBuf,

        /// 기존 기록을 대체
        #[arg(long, default_value = "false")]
        replace: bool,
    },

    /// CSV 내보내기
    Export {
        /// 출력 파일 경로 (기본: stock_journal_YYYY-MM-DD.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 예수금 보기/저장
    Cash {
        /// 새 예수금 (생략하면 현재 값 표시)
        value: Option<String>,
    },

    /// 매매 원칙 메모
    Principles {
        #[command(subcommand)]
        action: PrinciplesAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let loaded = match &cli.config {
        Some(path) => AppConfig::load(path),
        None => AppConfig::load_default(),
    };
    let config = loaded
        .map_err(JournalError::from)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    init_logging(LogConfig::from_settings(&config.logging).with_env_overrides())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let at = Moment::now();
    let result = match FileStore::open(&config.storage.path) {
        Ok(store) => execute(Journal::open(store, &config, at), cli, at).await,
        Err(e) => {
            error!(
                path = %config.storage.path.display(),
                error = %e,
                "Failed to open journal file, changes will not be saved"
            );
            execute(Journal::open(MemoryStore::new(), &config, at), cli, at).await
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            let user_facing = e
                .downcast_ref::<JournalError>()
                .is_some_and(JournalError::is_user_facing);
            if user_facing {
                warn!("Command rejected: {:#}", e);
            } else {
                error!("Command failed: {:#}", e);
            }
            Err(e)
        }
    }
}

async fn execute<S: KeyValueStore>(mut journal: Journal<S>, cli: Cli, at: Moment) -> Result<String> {
    journal.set_range(cli.range, at);
    info!(range = %cli.range, entries = journal.entries().len(), "Journal opened");
    run(&mut journal, cli.command, at).await
}

async fn run<S: KeyValueStore>(
    journal: &mut Journal<S>,
    command: Commands,
    at: Moment,
) -> Result<String> {
    match command {
        Commands::Add { fields } => entry::add_entry(journal, fields, at),
        Commands::Edit { id, fields } => entry::edit_entry(journal, id, fields),
        Commands::Delete { id } => entry::delete_entry(journal, id),
        Commands::Show { id, format } => entry::show_entry(journal, id, format),
        Commands::List { format } => entry::list_entries(journal, at, format),
        Commands::Stats => Ok(report::stats(journal, at)),
        Commands::Chart { output } => report::chart(journal, at, output.as_deref()).await,
        Commands::Hover { x, box_width } => Ok(report::hover(journal, at, x, box_width)),
        Commands::Import { file, replace } => {
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Merge
            };
            csv::import_file(journal, &file, mode, at).await
        }
        Commands::Export { output } => csv::export_file(journal, output, at).await,
        Commands::Cash { value } => settings::cash(journal, value.as_deref()),
        Commands::Principles { action } => settings::principles(journal, action),
    }
}
