//! 매매 기록.
//!
//! 이 모듈은 매매일지의 기록 타입을 정의합니다:
//! - `TradeEntry` - 저장되는 개별 매매 기록
//! - `EntryFields` - 입력 폼/수정 모달에서 넘어오는 필드 묶음
//! - `EntryIdGenerator` - 시각 기반 단조 증가 ID 발급기

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};
use crate::types::{format_iso_date, local_datetime_from_millis, parse_iso_date, parse_or_zero};

/// 필수 입력 누락 시 안내 문구.
pub const REQUIRED_FIELDS_MESSAGE: &str = "날짜, 종목, 평균 진입가, 수량은 필수입니다.";

/// 저장된 매매 기록.
///
/// 숫자처럼 보이는 필드도 입력 그대로 문자열로 보관하며,
/// 계산할 때 [`parse_or_zero`]로 해석합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    /// 기록 ID (생성 시각 기반)
    pub id: i64,
    /// 생성 시각 (에포크 밀리초)
    pub created_at: i64,
    /// 매매 날짜 (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    /// 종목
    #[serde(default)]
    pub symbol: String,
    /// 평균 진입가
    #[serde(default)]
    pub avg_entry: String,
    /// 1차 진입가
    #[serde(default)]
    pub entry1: String,
    /// 2차 진입가
    #[serde(default)]
    pub entry2: String,
    /// 3차 진입가
    #[serde(default)]
    pub entry3: String,
    /// 수량
    #[serde(default)]
    pub quantity: String,
    /// 손익
    #[serde(default)]
    pub pnl: String,
    /// 손익률
    #[serde(default)]
    pub pnl_percent: String,
    /// 진입 근거
    #[serde(default)]
    pub reason: String,
    /// 청산 이유
    #[serde(default)]
    pub exit_reason: String,
    /// 교훈
    #[serde(default)]
    pub lesson: String,
}

/// 손익 부호 분류 (표 색상 표시용).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PnlClass {
    Positive,
    Negative,
    Zero,
}

impl PnlClass {
    /// CSS 클래스 이름.
    pub fn css_class(&self) -> &'static str {
        match self {
            PnlClass::Positive => "pnl-positive",
            PnlClass::Negative => "pnl-negative",
            PnlClass::Zero => "pnl-zero",
        }
    }
}

impl TradeEntry {
    /// 입력 필드로 새 기록을 만듭니다.
    pub fn from_fields(id: i64, created_at: i64, fields: EntryFields) -> Self {
        Self {
            id,
            created_at,
            date: fields.date,
            symbol: fields.symbol,
            avg_entry: fields.avg_entry,
            entry1: fields.entry1,
            entry2: fields.entry2,
            entry3: fields.entry3,
            quantity: fields.quantity,
            pnl: fields.pnl,
            pnl_percent: fields.pnl_percent,
            reason: fields.reason,
            exit_reason: fields.exit_reason,
            lesson: fields.lesson,
        }
    }

    /// ID와 생성 시각은 유지한 채 나머지 필드를 통째로 교체한 기록을 반환합니다.
    pub fn replaced_with(&self, fields: EntryFields) -> Self {
        Self::from_fields(self.id, self.created_at, fields)
    }

    /// 현재 필드 값을 입력 필드 묶음으로 꺼냅니다.
    pub fn fields(&self) -> EntryFields {
        EntryFields {
            date: self.date.clone(),
            symbol: self.symbol.clone(),
            avg_entry: self.avg_entry.clone(),
            entry1: self.entry1.clone(),
            entry2: self.entry2.clone(),
            entry3: self.entry3.clone(),
            quantity: self.quantity.clone(),
            pnl: self.pnl.clone(),
            pnl_percent: self.pnl_percent.clone(),
            reason: self.reason.clone(),
            exit_reason: self.exit_reason.clone(),
            lesson: self.lesson.clone(),
        }
    }

    /// 손익을 숫자로 해석합니다. 해석할 수 없으면 0입니다.
    pub fn pnl_value(&self) -> Decimal {
        parse_or_zero(&self.pnl)
    }

    /// 매매 날짜. 비어 있거나 형식이 잘못되면 `None`.
    pub fn trade_date(&self) -> Option<NaiveDate> {
        if self.date.is_empty() {
            return None;
        }
        parse_iso_date(&self.date)
    }

    /// 기간 필터와 정렬에 쓰는 유효 시각.
    ///
    /// 매매 날짜의 로컬 자정, 날짜가 없으면 생성 시각입니다.
    pub fn effective_at(&self) -> NaiveDateTime {
        match self.trade_date() {
            Some(date) => date.and_time(NaiveTime::default()),
            None => local_datetime_from_millis(self.created_at),
        }
    }

    /// 차트 레이블: 매매 날짜 문자열, 없으면 생성일.
    pub fn label(&self) -> String {
        if self.date.is_empty() {
            format_iso_date(local_datetime_from_millis(self.created_at).date())
        } else {
            self.date.clone()
        }
    }

    /// 손익 부호 분류.
    pub fn pnl_class(&self) -> PnlClass {
        let pnl = self.pnl_value();
        if pnl > Decimal::ZERO {
            PnlClass::Positive
        } else if pnl < Decimal::ZERO {
            PnlClass::Negative
        } else {
            PnlClass::Zero
        }
    }
}

/// 입력 폼 필드 묶음.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryFields {
    pub date: String,
    pub symbol: String,
    pub avg_entry: String,
    pub entry1: String,
    pub entry2: String,
    pub entry3: String,
    pub quantity: String,
    pub pnl: String,
    pub pnl_percent: String,
    pub reason: String,
    pub exit_reason: String,
    pub lesson: String,
}

impl EntryFields {
    /// 필수 필드(날짜, 종목, 평균 진입가, 수량)가 모두 채워졌는지 확인합니다.
    pub fn validate(&self) -> JournalResult<()> {
        let missing = [
            ("date", &self.date),
            ("symbol", &self.symbol),
            ("avgEntry", &self.avg_entry),
            ("quantity", &self.quantity),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(JournalError::Validation(format!(
                "{} (누락: {})",
                REQUIRED_FIELDS_MESSAGE,
                missing.join(", ")
            )))
        }
    }

    /// 신규 등록용 정리: 날짜가 비면 오늘로 채우고 종목과 메모 필드를 trim 합니다.
    pub fn prepared_for_submit(mut self, today: NaiveDate) -> Self {
        if self.date.is_empty() {
            self.date = format_iso_date(today);
        }
        self.symbol = self.symbol.trim().to_string();
        self.trim_notes()
    }

    /// 수정용 정리: 메모 필드(진입 근거, 청산 이유, 교훈)만 trim 합니다.
    pub fn prepared_for_update(self) -> Self {
        self.trim_notes()
    }

    fn trim_notes(mut self) -> Self {
        self.reason = self.reason.trim().to_string();
        self.exit_reason = self.exit_reason.trim().to_string();
        self.lesson = self.lesson.trim().to_string();
        self
    }
}

/// 시각 기반 기록 ID 발급기.
///
/// 같은 밀리초에 여러 번 호출되어도 이전 값보다 항상 큰 ID를 돌려줍니다.
#[derive(Debug, Clone, Default)]
pub struct EntryIdGenerator {
    last: i64,
}

impl EntryIdGenerator {
    /// 이미 발급된 ID들 이후부터 이어서 발급하는 생성기.
    pub fn after<I: IntoIterator<Item = i64>>(existing: I) -> Self {
        Self {
            last: existing.into_iter().max().unwrap_or(0),
        }
    }

    /// 현재 시각(밀리초)을 기준으로 다음 ID를 발급합니다.
    pub fn next_id(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id
    }

    /// 마지막으로 발급한 ID. 아직 없으면 0.
    pub fn last_issued(&self) -> i64 {
        self.last
    }
}
