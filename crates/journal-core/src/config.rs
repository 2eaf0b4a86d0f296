//! 설정 관리.
//!
//! 기본값 → 설정 파일 → `JOURNAL__*` 환경 변수 순으로 덮어씁니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::DEFAULT_STARTING_CASH;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 차트 설정
    #[serde(default)]
    pub chart: ChartConfig,
    /// 매매일지 설정
    #[serde(default)]
    pub journal: JournalConfig,
}

/// 저장소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// 키-값 저장 파일 경로
    pub path: PathBuf,
    /// 페이지 식별자 (저장 키 네임스페이스)
    pub page_id: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/journal.json"),
            page_id: "stock".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// 차트 캔버스 크기와 여백 (픽셀).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_margin_left")]
    pub margin_left: u32,
    #[serde(default = "default_margin_right")]
    pub margin_right: u32,
    #[serde(default = "default_margin_top")]
    pub margin_top: u32,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: u32,
}

fn default_margin_left() -> u32 {
    40
}
fn default_margin_right() -> u32 {
    10
}
fn default_margin_top() -> u32 {
    10
}
fn default_margin_bottom() -> u32 {
    30
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 260,
            margin_left: default_margin_left(),
            margin_right: default_margin_right(),
            margin_top: default_margin_top(),
            margin_bottom: default_margin_bottom(),
        }
    }
}

/// 매매일지 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    /// 저장된 설정이 없을 때 사용할 예수금
    pub default_starting_cash: Decimal,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            default_starting_cash: DEFAULT_STARTING_CASH,
        }
    }
}

/// `--config`를 지정하지 않았을 때 읽는 설정 파일.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("storage.path", "data/journal.json")?
            .set_default("storage.page_id", "stock")?
            .set_default("logging.level", "warn")?
            .set_default("logging.format", "compact")?
            .set_default("chart.width", 800)?
            .set_default("chart.height", 260)?
            .set_default("journal.default_starting_cash", "10000000")?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("JOURNAL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// [`DEFAULT_CONFIG_PATH`]에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }
}
