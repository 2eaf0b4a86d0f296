//! 문자열로 저장된 숫자 필드를 위한 Decimal 유틸리티.
//!
//! 매매 기록의 숫자 필드(평균 진입가, 수량, 손익 등)는 입력된 문자열 그대로
//! 저장되고, 계산이 필요할 때만 숫자로 해석됩니다. 해석에 실패한 값은
//! 에러 없이 0으로 취급합니다.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// 문자열을 숫자로 해석합니다.
///
/// 앞뒤 공백은 무시하며, 지수 표기(`2.5e3`)를 허용합니다.
/// 빈 문자열, 천 단위 구분자, 16진수, 그 밖의 문자가 섞인 값은 `None`입니다.
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }

    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// 숫자로 해석하되, 실패하면 0을 반환합니다.
///
/// ```
/// use journal_core::parse_or_zero;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_or_zero("50000"), Decimal::from(50000));
/// assert_eq!(parse_or_zero(""), Decimal::ZERO);
/// assert_eq!(parse_or_zero("n/a"), Decimal::ZERO);
/// ```
pub fn parse_or_zero(raw: &str) -> Decimal {
    parse_number(raw).unwrap_or(Decimal::ZERO)
}

/// 값이 없을 수도 있는 필드를 해석합니다. `None`은 0입니다.
pub fn parse_or_zero_opt(raw: Option<&str>) -> Decimal {
    raw.map(parse_or_zero).unwrap_or(Decimal::ZERO)
}

/// 표시용 Decimal 확장 트레이트.
pub trait DecimalExt {
    /// 소수점 둘째 자리까지 반올림 (0.5는 0에서 멀어지는 방향).
    fn round2(&self) -> Decimal;

    /// 소수점 둘째 자리 고정 문자열 (예: "12.50").
    fn to_fixed2(&self) -> String;

    /// 백분율 값을 "5.25%" 형식으로 변환합니다.
    fn to_percent_display(&self) -> String;

    /// 정수로 반올림하고 천 단위 구분자를 넣습니다 (예: "10,050,000").
    fn to_grouped_int(&self) -> String;
}

impl DecimalExt for Decimal {
    fn round2(&self) -> Decimal {
        self.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_fixed2(&self) -> String {
        format!("{:.2}", self.round2())
    }

    fn to_percent_display(&self) -> String {
        format!("{}%", self.to_fixed2())
    }

    fn to_grouped_int(&self) -> String {
        // 0.5는 양의 무한대 방향으로 올림
        let rounded = self
            .checked_add(Decimal::new(5, 1))
            .map(|d| d.floor())
            .unwrap_or_else(|| self.floor());
        let value = rounded.to_i128().unwrap_or(0);
        group_thousands(value)
    }
}

/// `base` 대비 `value`의 백분율.
///
/// 기준이 0 이하이거나 결과가 Decimal 범위를 넘으면 `None`입니다.
pub fn percent_of(value: Decimal, base: Decimal) -> Option<Decimal> {
    if base <= Decimal::ZERO {
        return None;
    }
    value.checked_div(base)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// 숫자 필드를 표 표시용 문자열로 변환합니다.
///
/// 숫자로 해석되지 않는 값은 빈 문자열입니다.
pub fn format_fixed2(raw: &str) -> String {
    parse_number(raw)
        .map(|d| d.to_fixed2())
        .unwrap_or_default()
}

fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
