//! 예수금 설정.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::error::{JournalError, JournalResult};

/// 저장된 설정이 없을 때의 예수금.
pub const DEFAULT_STARTING_CASH: Decimal = dec!(10_000_000);

/// 자산 계산의 기준이 되는 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// 예수금 (0 이상)
    pub starting_cash: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_cash: DEFAULT_STARTING_CASH,
        }
    }
}

impl Settings {
    /// 검증된 예수금으로 설정을 만듭니다.
    pub fn new(starting_cash: Decimal) -> JournalResult<Self> {
        if starting_cash < Decimal::ZERO {
            return Err(JournalError::Validation(
                "예수금은 0 이상 숫자여야 합니다.".to_string(),
            ));
        }
        Ok(Self { starting_cash })
    }

    /// 저장된 JSON 객체에서 설정을 읽습니다.
    ///
    /// `startingCash`가 0 이상의 JSON 숫자일 때만 유효합니다.
    /// 문자열로 저장된 숫자나 음수는 없는 것으로 취급합니다.
    pub fn from_stored(value: &Value) -> Option<Self> {
        let cash = value.get("startingCash")?.as_f64()?;
        if !cash.is_finite() || cash < 0.0 {
            return None;
        }
        Decimal::from_f64(cash).map(|starting_cash| Self { starting_cash })
    }

    /// 저장용 JSON 객체로 변환합니다.
    pub fn to_stored(&self) -> Value {
        match self.starting_cash.to_i64() {
            Some(whole) if self.starting_cash.fract().is_zero() => json!({ "startingCash": whole }),
            _ => json!({ "startingCash": self.starting_cash.to_f64().unwrap_or(0.0) }),
        }
    }
}
