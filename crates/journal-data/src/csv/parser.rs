//! CSV 텍스트 파서.
//!
//! 따옴표 안/밖 두 상태만 가진 관대한 파서입니다. 형식이 어긋난 입력에도
//! 에러를 내지 않고 최대한 셀을 만들어 냅니다.
//!
//! - 따옴표 안의 `""`는 `"` 하나
//! - 따옴표 밖의 쉼표는 셀 구분, `\n`은 행 구분, `\r`은 버림
//! - 마지막 줄바꿈 뒤에는 행을 만들지 않음

use std::collections::HashMap;

/// 헤더 이름 → 셀 값.
pub type CsvRow = HashMap<String, String>;

const BOM: char = '\u{feff}';

/// 텍스트를 셀 목록의 행 목록으로 나눕니다.
pub fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.strip_prefix(BOM).unwrap_or(text).chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }

    if !cell.is_empty() || in_quotes || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    rows
}

/// CSV 텍스트를 헤더 기준의 행 목록으로 해석합니다.
///
/// 첫 행은 헤더(앞뒤 공백 제거)이며, 이후 행은 위치대로 헤더 이름에 대응됩니다.
/// 셀이 모자라면 빈 문자열, 남는 셀은 버립니다. 셀이 하나뿐이고 비어 있는 행은 건너뜁니다.
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let mut records = split_records(text).into_iter();
    let header: Vec<String> = match records.next() {
        Some(header) => header.iter().map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    records
        .filter(|r| r.len() > 1 || r.first().is_some_and(|c| !c.trim().is_empty()))
        .map(|r| {
            header
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.clone(), r.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_quotes() {
        let rows = split_records("a,b\n\"He said \"\"hi\"\", ok\",2\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "He said \"hi\", ok");
        assert_eq!(rows[1][1], "2");
    }

    #[test]
    fn test_crlf_and_trailing_newline() {
        let rows = split_records("a,b\r\n1,2\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_newline_inside_quotes() {
        let rows = split_records("lesson\n\"line1\r\nline2\"");
        assert_eq!(rows[1][0], "line1\r\nline2");
    }

    #[test]
    fn test_unterminated_quote_keeps_cell() {
        let rows = split_records("a\n\"open");
        assert_eq!(rows[1], vec!["open"]);

        // 닫힌 빈 따옴표만 남은 마지막 줄은 행이 되지 않음
        let rows = split_records("a\n\"\"");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_bom_is_stripped() {
        let rows = parse_csv("\u{feff}date,pnl\n2024-01-01,5");
        assert_eq!(rows[0]["date"], "2024-01-01");
    }

    #[test]
    fn test_parse_maps_header_positions() {
        let rows = parse_csv(" date , symbol ,pnl\n2024-01-01,삼성전자\n\n2024-01-02,A,1,extra\n");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-01-01");
        assert_eq!(rows[0]["symbol"], "삼성전자");
        assert_eq!(rows[0]["pnl"], "");
        assert_eq!(rows[1]["pnl"], "1");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_blank_single_cell_rows_dropped() {
        let rows = parse_csv("date\n   \n2024-01-01\n,\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-01-01");
        assert_eq!(rows[1]["date"], "");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("date,pnl").is_empty());
    }
}
