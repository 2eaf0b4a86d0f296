//! 매매일지의 에러 타입.
//!
//! 이 모듈은 매매일지 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 매매일지 에러.
#[derive(Debug, Error)]
pub enum JournalError {
    /// 필수 입력 누락 등 입력 검증 실패
    #[error("입력 검증 실패: {0}")]
    Validation(String),

    /// 영구 저장소 읽기/쓰기 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 저장된 데이터 해석 실패
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 차트 렌더링 에러
    #[error("차트 렌더링 에러: {0}")]
    Render(String),
}

/// 매매일지 작업을 위한 Result 타입.
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// 사용자에게 다시 입력을 요청해야 하는 에러인지 확인합니다.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, JournalError::Validation(_) | JournalError::NotFound(_))
    }

    /// 기본 상태로 대체하고 계속 진행할 수 있는 에러인지 확인합니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, JournalError::Storage(_) | JournalError::Parse(_))
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Parse(err.to_string())
    }
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::Config(err.to_string())
    }
}
