//! 데이터 모듈 오류 타입.

use journal_core::JournalError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 저장 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 저장소 읽기/쓰기 오류
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for JournalError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => JournalError::NotFound(msg),
            DataError::SerializationError(msg) => JournalError::Parse(msg),
            DataError::InvalidData(msg) => JournalError::Validation(msg),
            DataError::Io(e) => JournalError::Storage(e.to_string()),
            DataError::StorageError(msg) => JournalError::Storage(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
