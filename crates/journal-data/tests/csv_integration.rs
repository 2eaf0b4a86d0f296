//! CSV 통합 테스트
//!
//! 내보내기 → 가져오기 왕복, 한글 헤더, 따옴표 처리 확인

use journal_core::{EntryFields, TradeEntry};
use journal_data::csv::{import_entries, parse_csv, write_csv};
use proptest::prelude::*;

const NOW: i64 = 1_718_000_000_000;

#[test]
fn test_quoted_comma_and_quotes() {
    let rows = parse_csv("date,avgEntry,quantity,lesson\n2024-01-01,1,1,\"He said \"\"hi\"\", ok\"\n");
    assert_eq!(rows[0]["lesson"], "He said \"hi\", ok");
}

#[test]
fn test_korean_header_import() {
    let entries = import_entries("날짜,종목,수량,평균진입가\r\n2024-03-04,카카오,20,52000\r\n", NOW);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].symbol, "카카오");
    assert_eq!(entries[0].avg_entry, "52000");
    assert_eq!(entries[0].quantity, "20");
}

#[test]
fn test_round_trip_preserves_entries() {
    let entries = vec![
        TradeEntry::from_fields(
            11,
            1_704_844_800_000,
            EntryFields {
                date: "2024-01-10".to_string(),
                symbol: "SK하이닉스".to_string(),
                avg_entry: "135000".to_string(),
                entry1: "134000".to_string(),
                quantity: "3".to_string(),
                pnl: "-12000".to_string(),
                pnl_percent: "-2.9".to_string(),
                reason: "실적 발표 전 선진입".to_string(),
                exit_reason: "손절, 원칙대로".to_string(),
                lesson: "여러 줄\r\n메모 \"인용\"".to_string(),
                ..Default::default()
            },
        ),
        TradeEntry::from_fields(
            12,
            1_704_931_200_000,
            EntryFields {
                date: "2024-01-11".to_string(),
                symbol: "NAVER".to_string(),
                avg_entry: "201500".to_string(),
                quantity: "1".to_string(),
                ..Default::default()
            },
        ),
    ];

    let restored = import_entries(&write_csv(&entries), NOW);
    assert_eq!(restored, entries);
}

#[test]
fn test_garbage_rows_are_dropped_individually() {
    let text = "date,avgEntry,quantity\n\
                2024-01-01,100,1\n\
                not,a\n\
                ,,\n\
                2024-01-02,200,2\n";
    let entries = import_entries(text, NOW);
    assert_eq!(entries.len(), 2);
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(",".to_string()),
            Just("\"".to_string()),
            Just("\r\n".to_string()),
            Just("\n".to_string()),
            Just(" ".to_string()),
            "[a-z가-힣0-9.\\-]{0,6}",
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_required() -> impl Strategy<Value = String> {
    prop_oneof![arb_text(), "[0-9]{1,6}"].prop_filter("required", |s| !s.is_empty())
}

fn arb_entry() -> impl Strategy<Value = (i64, EntryFields)> {
    (
        0i64..1_000_000_000_000,
        (0u32..3000).prop_map(|d| {
            (chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(d as u64))
                .format("%Y-%m-%d")
                .to_string()
        }),
        arb_text(),
        arb_required(),
        arb_required(),
        arb_text(),
        arb_text(),
    )
        .prop_map(|(id, date, symbol, avg_entry, quantity, pnl, lesson)| {
            (
                id,
                EntryFields {
                    date,
                    symbol,
                    avg_entry,
                    quantity,
                    pnl,
                    lesson,
                    ..Default::default()
                },
            )
        })
}

proptest! {
    #[test]
    fn prop_csv_round_trip(rows in prop::collection::vec(arb_entry(), 0..20)) {
        let entries: Vec<TradeEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (id, fields))| TradeEntry::from_fields(id, i as i64 * 1000, fields))
            .collect();

        let restored = import_entries(&write_csv(&entries), NOW);
        prop_assert_eq!(restored, entries);
    }

    #[test]
    fn prop_parser_never_panics(text in arb_text()) {
        let _ = parse_csv(&text);
    }
}
