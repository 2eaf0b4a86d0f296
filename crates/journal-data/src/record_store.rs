//! 메모리 상의 매매 기록 컬렉션.
//!
//! 저장 순서를 유지하는 기록 목록과 ID 발급기를 함께 관리합니다.
//! 영구 저장은 호출자가 [`crate::JournalRepository::save_entries`]로 수행합니다.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use journal_core::{EntryFields, EntryIdGenerator, JournalError, JournalResult, TradeEntry};

/// CSV 가져오기 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// 기존 기록 뒤에 추가
    #[default]
    Merge,
    /// 기존 기록을 모두 교체
    Replace,
}

/// 매매 기록 저장소 (메모리).
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<TradeEntry>,
    ids: EntryIdGenerator,
}

impl EntryStore {
    /// 불러온 기록으로 저장소를 만듭니다. ID는 기존 최댓값 이후부터 발급합니다.
    pub fn new(entries: Vec<TradeEntry>) -> Self {
        let ids = EntryIdGenerator::after(entries.iter().map(|e| e.id));
        Self { entries, ids }
    }

    /// 저장 순서 그대로의 기록 목록
    pub fn entries(&self) -> &[TradeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&TradeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 새 기록을 등록합니다.
    ///
    /// 날짜가 비어 있으면 `today`로 채우고, 필수 필드가 비면 검증 에러를 반환합니다.
    /// 검증에 실패하면 저장소는 변경되지 않습니다.
    pub fn submit(
        &mut self,
        fields: EntryFields,
        today: NaiveDate,
        now_millis: i64,
    ) -> JournalResult<&TradeEntry> {
        let fields = fields.prepared_for_submit(today);
        fields.validate()?;

        let id = self.ids.next_id(now_millis);
        self.entries.push(TradeEntry::from_fields(id, now_millis, fields));
        info!(id, "Trade entry created");

        Ok(&self.entries[self.entries.len() - 1])
    }

    /// 기록 전체를 새 필드로 교체합니다. ID와 생성 시각은 유지됩니다.
    pub fn update(&mut self, id: i64, fields: EntryFields) -> JournalResult<&TradeEntry> {
        let fields = fields.prepared_for_update();
        fields.validate()?;

        let index = self.position(id)?;
        let replaced = self.entries[index].replaced_with(fields);
        self.entries[index] = replaced;
        info!(id, "Trade entry updated");

        Ok(&self.entries[index])
    }

    /// 기록을 삭제하고 삭제된 기록을 반환합니다.
    pub fn delete(&mut self, id: i64) -> JournalResult<TradeEntry> {
        let index = self.position(id)?;
        let removed = self.entries.remove(index);
        info!(id, "Trade entry deleted");
        Ok(removed)
    }

    /// 가져온 기록을 반영합니다.
    ///
    /// 가져온 기록의 ID가 기존 기록이나 다른 가져온 기록과 겹치면 새 ID를 발급합니다.
    /// 반환값은 반영된 기록 수입니다.
    pub fn import(
        &mut self,
        imported: Vec<TradeEntry>,
        mode: ImportMode,
        now_millis: i64,
    ) -> usize {
        let mut seen: HashSet<i64> = match mode {
            ImportMode::Merge => self.entries.iter().map(|e| e.id).collect(),
            ImportMode::Replace => HashSet::new(),
        };

        let mut accepted = Vec::with_capacity(imported.len());
        let mut ids = EntryIdGenerator::after(
            seen.iter()
                .copied()
                .chain(imported.iter().map(|e| e.id))
                .chain(std::iter::once(self.ids.last_issued())),
        );
        for mut entry in imported {
            if !seen.insert(entry.id) {
                let fresh = ids.next_id(now_millis);
                debug!(old = entry.id, new = fresh, "Duplicate imported id reassigned");
                entry.id = fresh;
                seen.insert(fresh);
            }
            accepted.push(entry);
        }

        let count = accepted.len();
        match mode {
            ImportMode::Merge => self.entries.extend(accepted),
            ImportMode::Replace => self.entries = accepted,
        }
        self.ids = EntryIdGenerator::after(
            self.entries
                .iter()
                .map(|e| e.id)
                .chain(std::iter::once(ids.last_issued())),
        );

        info!(count, ?mode, total = self.entries.len(), "Trade entries imported");
        count
    }

    fn position(&self, id: i64) -> JournalResult<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| JournalError::NotFound(format!("매매 기록 id {}", id)))
    }
}

/// 표 표시 순서: 생성 시각 내림차순 (최신 기록 먼저).
pub fn newest_first<'a, I>(rows: I) -> Vec<&'a TradeEntry>
where
    I: IntoIterator<Item = &'a TradeEntry>,
{
    let mut rows: Vec<_> = rows.into_iter().collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn fields(symbol: &str) -> EntryFields {
        EntryFields {
            date: "2024-06-01".to_string(),
            symbol: symbol.to_string(),
            avg_entry: "1000".to_string(),
            quantity: "5".to_string(),
            pnl: "100".to_string(),
            ..Default::default()
        }
    }

    fn imported(id: i64, created_at: i64) -> TradeEntry {
        TradeEntry::from_fields(id, created_at, fields("IMP"))
    }

    #[test]
    fn test_submit_assigns_unique_ids() {
        let mut store = EntryStore::default();
        let now = 1_717_000_000_000;

        let a = store.submit(fields("A"), today(), now).unwrap().id;
        let b = store.submit(fields("B"), today(), now).unwrap().id;
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(a).unwrap().created_at, now);
    }

    #[test]
    fn test_submit_validation_leaves_store_untouched() {
        let mut store = EntryStore::default();
        let mut bad = fields("A");
        bad.quantity.clear();

        let err = store.submit(bad, today(), 1).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = EntryStore::new(vec![imported(10, 10), imported(20, 20)]);

        let mut changed = fields("B");
        changed.lesson = "  손절 지키기 ".to_string();
        let updated = store.update(20, changed).unwrap();
        assert_eq!(updated.symbol, "B");
        assert_eq!(updated.lesson, "손절 지키기");
        assert_eq!(updated.created_at, 20);

        let mut blank = fields("B");
        blank.date.clear();
        assert!(matches!(store.update(20, blank), Err(JournalError::Validation(_))));
        assert!(matches!(store.update(99, fields("X")), Err(JournalError::NotFound(_))));

        let removed = store.delete(10).unwrap();
        assert_eq!(removed.id, 10);
        assert!(matches!(store.delete(10), Err(JournalError::NotFound(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_new_store_continues_after_existing_ids() {
        let mut store = EntryStore::new(vec![imported(5_000, 1)]);
        let id = store.submit(fields("A"), today(), 100).unwrap().id;
        assert_eq!(id, 5_001);
    }

    #[test]
    fn test_merge_reassigns_duplicate_ids() {
        let mut store = EntryStore::new(vec![imported(1, 1), imported(2, 2)]);

        let batch = vec![imported(2, 3), imported(3, 4), imported(3, 5)];
        let count = store.import(batch, ImportMode::Merge, 100);
        assert_eq!(count, 3);
        assert_eq!(store.len(), 5);

        let ids: HashSet<i64> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 5);

        let next = store.submit(fields("A"), today(), 0).unwrap().id;
        assert!(store.entries()[..5].iter().all(|e| e.id < next));
    }

    #[test]
    fn test_replace_import() {
        let mut store = EntryStore::new(vec![imported(1, 1)]);
        store.import(vec![imported(1, 7), imported(8, 8)], ImportMode::Replace, 100);

        let ids: Vec<i64> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, [1, 8]);
        assert_eq!(store.get(1).unwrap().created_at, 7);
    }

    #[test]
    fn test_newest_first() {
        let rows = vec![imported(1, 10), imported(2, 30), imported(3, 20)];
        let ordered: Vec<i64> = newest_first(&rows).iter().map(|e| e.id).collect();
        assert_eq!(ordered, [2, 3, 1]);
    }
}
