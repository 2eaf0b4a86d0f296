//! CLI 명령어 구현 모듈.

pub mod csv;
pub mod entry;
pub mod report;
pub mod settings;

use clap::ValueEnum;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
