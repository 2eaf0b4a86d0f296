//! 매매일지 애플리케이션 상태.
//!
//! 저장소, 기록 목록, 예수금 설정, 현재 조회 기간, 마지막 차트 좌표를
//! 하나의 [`Journal`] 값이 소유합니다. 모든 작업은 동기 메서드입니다.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{error, info, warn};

use journal_analytics::{
    ChartGeometry, ChartLayout, ChartRenderer, EquitySeries, RangePreset, RangeWindow,
    TodayStats, Tooltip,
};
use journal_core::{
    entry_span, format_fixed2, parse_number, AppConfig, EntryFields, JournalError, JournalResult, PnlClass,
    Settings, TradeEntry,
};
use journal_data::csv::{export_file_name, import_entries, write_csv};
use journal_data::{
    newest_first, EntryStore, ImportMode, JournalRepository, KeyValueStore, PrinciplesNote,
    SettingsSource,
};

/// 가져올 행이 없을 때의 안내 문구.
pub const NO_VALID_ROWS_MESSAGE: &str = "가져올 유효한 행이 없습니다.";

/// 작업 하나에서 사용하는 현재 시각.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    /// 로컬 벽시계 시각
    pub local: NaiveDateTime,
    /// 에포크 밀리초
    pub epoch_millis: i64,
}

impl Moment {
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            local: now.naive_local(),
            epoch_millis: now.timestamp_millis(),
        }
    }

    pub fn at(local: NaiveDateTime, epoch_millis: i64) -> Self {
        Self {
            local,
            epoch_millis,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.local.date()
    }
}

/// 표 한 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: i64,
    pub date: String,
    pub symbol: String,
    pub avg_entry: String,
    pub quantity: String,
    pub pnl: String,
    pub pnl_percent: String,
    #[serde(skip)]
    pub pnl_class: PnlClass,
}

impl From<&TradeEntry> for TableRow {
    fn from(entry: &TradeEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date.clone(),
            symbol: entry.symbol.clone(),
            avg_entry: format_fixed2(&entry.avg_entry),
            quantity: format_fixed2(&entry.quantity),
            pnl: format_fixed2(&entry.pnl),
            pnl_percent: format_fixed2(&entry.pnl_percent),
            pnl_class: entry.pnl_class(),
        }
    }
}

/// 매매일지 애플리케이션 상태.
#[derive(Debug)]
pub struct Journal<S> {
    repo: JournalRepository<S>,
    entries: EntryStore,
    settings: Settings,
    range: RangeWindow,
    renderer: ChartRenderer,
}

impl<S: KeyValueStore> Journal<S> {
    /// 저장소에서 원칙/설정/기록을 불러와 전체 기간으로 시작합니다.
    pub fn open(store: S, config: &AppConfig, at: Moment) -> Self {
        let mut repo = JournalRepository::new(store, &config.storage.page_id);

        let default = Settings::new(config.journal.default_starting_cash).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid default starting cash in config, using built-in default");
            Settings::default()
        });
        let (settings, source) = repo.load_settings(default);
        if source == SettingsSource::Migrated {
            info!("Starting cash migrated from legacy settings");
        }

        let entries = EntryStore::new(repo.load_entries());

        Self {
            repo,
            entries,
            settings,
            range: RangeWindow::from_preset(RangePreset::All, at.local),
            renderer: ChartRenderer::new(ChartLayout::from(&config.chart)),
        }
    }

    pub fn entries(&self) -> &[TradeEntry] {
        self.entries.entries()
    }

    pub fn entry(&self, id: i64) -> Option<&TradeEntry> {
        self.entries.get(id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn range(&self) -> &RangeWindow {
        &self.range
    }

    pub fn repository(&self) -> &JournalRepository<S> {
        &self.repo
    }

    // =========================================================================
    // 기록 등록/수정/삭제
    // =========================================================================

    /// 새 기록을 등록하고 저장합니다.
    pub fn submit_entry(&mut self, fields: EntryFields, at: Moment) -> JournalResult<TradeEntry> {
        let snapshot = self.entries.clone();
        let created = self
            .entries
            .submit(fields, at.today(), at.epoch_millis)?
            .clone();
        self.commit_entries(snapshot)?;
        Ok(created)
    }

    /// 기록을 통째로 교체하고 저장합니다.
    pub fn update_entry(&mut self, id: i64, fields: EntryFields) -> JournalResult<TradeEntry> {
        let _span = entry_span!("update_entry", id, fields.symbol).entered();
        let snapshot = self.entries.clone();
        let updated = self.entries.update(id, fields)?.clone();
        self.commit_entries(snapshot)?;
        Ok(updated)
    }

    /// 기록을 삭제하고 저장합니다.
    pub fn delete_entry(&mut self, id: i64) -> JournalResult<TradeEntry> {
        let _span = entry_span!("delete_entry", id).entered();
        let snapshot = self.entries.clone();
        let removed = self.entries.delete(id)?;
        self.commit_entries(snapshot)?;
        Ok(removed)
    }

    /// 변경된 기록을 저장합니다. 실패하면 변경 전 상태로 되돌립니다.
    fn commit_entries(&mut self, snapshot: EntryStore) -> JournalResult<()> {
        if let Err(e) = self.repo.save_entries(self.entries.entries()) {
            error!(error = %e, "Failed to save entries, rolling back");
            self.entries = snapshot;
            return Err(e.into());
        }
        Ok(())
    }

    // =========================================================================
    // 조회 기간, 표, 통계
    // =========================================================================

    /// 조회 기간을 바꿉니다.
    pub fn set_range(&mut self, preset: RangePreset, at: Moment) -> RangeWindow {
        self.range = RangeWindow::from_preset(preset, at.local);
        self.range
    }

    /// 조회 기간 안의 기록을 최신 생성순으로 돌려줍니다.
    pub fn table_rows(&self, at: Moment) -> Vec<TableRow> {
        let windowed = self.range.filter(self.entries.entries(), at.local);
        newest_first(windowed)
            .into_iter()
            .map(TableRow::from)
            .collect()
    }

    /// 현재 조회 기간의 자산 곡선.
    pub fn compute_series(&self, at: Moment) -> EquitySeries {
        EquitySeries::build(
            self.entries.entries(),
            &self.range,
            self.settings.starting_cash,
            at.local,
        )
    }

    /// 오늘 손익 통계.
    pub fn today_stats(&self, at: Moment) -> TodayStats {
        TodayStats::compute(self.entries.entries(), self.settings.starting_cash, at.today())
    }

    // =========================================================================
    // 차트
    // =========================================================================

    /// 자산 곡선 좌표를 계산하고 hit-test용으로 보관합니다.
    pub fn render(&mut self, at: Moment) -> &ChartGeometry {
        let series = self.compute_series(at);
        self.renderer.render(&series.points, series.baseline_equity)
    }

    /// 자산 곡선을 SVG로 렌더링합니다.
    pub fn render_svg(&mut self, at: Moment) -> JournalResult<String> {
        let series = self.compute_series(at);
        self.renderer
            .render_svg(&series.points, series.baseline_equity)
    }

    /// 마지막으로 그린 차트에서 X 좌표의 툴팁을 찾습니다.
    pub fn hit_test(&self, x: f64, box_width: Option<f64>) -> Option<Tooltip> {
        self.renderer.hit_test(x, box_width)
    }

    // =========================================================================
    // CSV
    // =========================================================================

    /// CSV 텍스트를 가져옵니다. 유효한 행이 없으면 아무것도 바꾸지 않습니다.
    pub fn import_csv(&mut self, text: &str, mode: ImportMode, at: Moment) -> JournalResult<usize> {
        let imported = import_entries(text, at.epoch_millis);
        if imported.is_empty() {
            return Err(JournalError::Validation(NO_VALID_ROWS_MESSAGE.to_string()));
        }

        let snapshot = self.entries.clone();
        let count = self.entries.import(imported, mode, at.epoch_millis);
        self.commit_entries(snapshot)?;
        Ok(count)
    }

    /// 전체 기록을 CSV 텍스트로 내보냅니다.
    pub fn export_csv(&self) -> String {
        write_csv(self.entries.entries())
    }

    /// 내보내기 파일 이름.
    pub fn export_file_name(&self, at: Moment) -> String {
        export_file_name(at.today())
    }

    // =========================================================================
    // 예수금, 원칙 메모
    // =========================================================================

    /// 예수금을 저장합니다. 0 이상의 숫자만 허용합니다.
    pub fn set_starting_cash(&mut self, raw: &str) -> JournalResult<Settings> {
        let invalid = || JournalError::Validation("예수금은 0 이상 숫자여야 합니다.".to_string());
        let value = parse_number(raw).ok_or_else(invalid)?;
        let settings = Settings::new(value)?;

        self.repo.save_settings(&settings)?;
        self.settings = settings;
        info!(starting_cash = %settings.starting_cash, "Starting cash saved");
        Ok(settings)
    }

    pub fn load_principles(&self) -> PrinciplesNote {
        self.repo.load_principles()
    }

    /// 앞뒤 공백을 제거해 저장합니다. 저장된 내용과 같으면 `None`.
    pub fn save_principles(&mut self, text: &str) -> JournalResult<Option<String>> {
        let changed = self.repo.save_principles_if_changed(text)?;
        Ok(changed.then(|| text.trim().to_string()))
    }

    pub fn clear_principles(&mut self) -> JournalResult<()> {
        Ok(self.repo.clear_principles()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_data::MemoryStore;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32) -> Moment {
        let local = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Moment::at(local, local.and_utc().timestamp_millis())
    }

    fn fields(date: &str, symbol: &str, pnl: &str) -> EntryFields {
        EntryFields {
            date: date.to_string(),
            symbol: symbol.to_string(),
            avg_entry: "10000".to_string(),
            quantity: "3".to_string(),
            pnl: pnl.to_string(),
            ..Default::default()
        }
    }

    fn journal() -> Journal<MemoryStore> {
        Journal::open(MemoryStore::new(), &AppConfig::default(), at(2024, 6, 12))
    }

    #[test]
    fn test_submit_persists() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        let created = journal.submit_entry(fields("", " 카카오 ", "1500"), now).unwrap();

        assert_eq!(created.date, "2024-06-12");
        assert_eq!(created.symbol, "카카오");

        let reopened = Journal::open(
            journal.repo.into_store(),
            &AppConfig::default(),
            now,
        );
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.entries()[0], created);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        journal.submit_entry(fields("2024-06-01", "A", "1"), now).unwrap();

        journal.repo.store_mut().set_read_only(true);
        let err = journal.submit_entry(fields("2024-06-02", "B", "2"), now).unwrap_err();
        assert!(matches!(err, JournalError::Storage(_)));
        assert_eq!(journal.entries().len(), 1);

        let id = journal.entries()[0].id;
        assert!(journal.delete_entry(id).is_err());
        assert!(journal.entry(id).is_some());
    }

    #[test]
    fn test_update_and_delete() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        let id = journal.submit_entry(fields("2024-06-01", "A", "1"), now).unwrap().id;

        let updated = journal.update_entry(id, fields("2024-06-02", "B", "-5")).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.pnl, "-5");

        assert!(matches!(
            journal.update_entry(id, fields("2024-06-02", "", "0")),
            Err(JournalError::Validation(_))
        ));
        assert_eq!(journal.entry(id).unwrap().symbol, "B");

        journal.delete_entry(id).unwrap();
        assert!(matches!(journal.delete_entry(id), Err(JournalError::NotFound(_))));
    }

    #[test]
    fn test_series_and_table_follow_range() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        journal.submit_entry(fields("2024-01-10", "A", "50000"), now).unwrap();
        journal.submit_entry(fields("2024-06-11", "B", "-2000.5"), now).unwrap();

        let series = journal.compute_series(now);
        assert_eq!(series.last_equity, dec!(10_047_999.5));
        assert_eq!(journal.table_rows(now).len(), 2);

        journal.set_range(RangePreset::Week, now);
        let series = journal.compute_series(now);
        assert_eq!(series.baseline_equity, dec!(10_050_000));
        assert_eq!(series.total_pnl, dec!(-2000.5));

        let rows = journal.table_rows(now);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "B");
        assert_eq!(rows[0].pnl, "-2000.50");
        assert_eq!(rows[0].avg_entry, "10000.00");
        assert_eq!(rows[0].pnl_class, PnlClass::Negative);
    }

    #[test]
    fn test_render_then_hit_test() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        assert!(journal.hit_test(100.0, None).is_none());

        journal.submit_entry(fields("2024-06-10", "A", "100000"), now).unwrap();
        let geometry = journal.render(now);
        assert_eq!(geometry.points.len(), 2);

        let tip = journal.hit_test(790.0, None).unwrap();
        assert_eq!(tip.equity, dec!(10_100_000));
        assert_eq!(tip.return_pct, dec!(1));
    }

    #[test]
    fn test_import_modes() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        journal.submit_entry(fields("2024-06-01", "A", "1"), now).unwrap();

        let csv = "날짜,종목,수량,평균진입가,손익\n2024-05-01,B,1,100,10\n2024-05-02,C,1,100,20\n";
        assert_eq!(journal.import_csv(csv, ImportMode::Merge, now).unwrap(), 2);
        assert_eq!(journal.entries().len(), 3);

        assert_eq!(journal.import_csv(csv, ImportMode::Replace, now).unwrap(), 2);
        assert_eq!(journal.entries().len(), 2);

        let err = journal.import_csv("date,pnl\n2024-01-01,5\n", ImportMode::Replace, now);
        assert!(matches!(err, Err(JournalError::Validation(ref m)) if m == NO_VALID_ROWS_MESSAGE));
        assert_eq!(journal.entries().len(), 2);
    }

    #[test]
    fn test_export_round_trip() {
        let now = at(2024, 6, 12);
        let mut journal = journal();
        journal.submit_entry(fields("2024-06-01", "A", "1"), now).unwrap();
        journal.submit_entry(fields("2024-06-02", "B", "2"), now).unwrap();

        let csv = journal.export_csv();
        let before = journal.entries().to_vec();
        journal.import_csv(&csv, ImportMode::Replace, now).unwrap();
        assert_eq!(journal.entries(), before.as_slice());
        assert_eq!(journal.export_file_name(now), "stock_journal_2024-06-12.csv");
    }

    #[test]
    fn test_starting_cash() {
        let now = at(2024, 6, 12);
        let mut journal = journal();

        assert!(matches!(journal.set_starting_cash("-1"), Err(JournalError::Validation(_))));
        assert!(matches!(journal.set_starting_cash("abc"), Err(JournalError::Validation(_))));
        assert_eq!(journal.settings().starting_cash, dec!(10_000_000));

        journal.set_starting_cash("5000000").unwrap();
        journal.submit_entry(fields("2024-06-12", "A", "50000"), now).unwrap();
        let stats = journal.today_stats(now);
        assert_eq!(stats.return_on_cash_display(), "1.00%");
    }

    #[test]
    fn test_principles() {
        let mut journal = journal();
        assert_eq!(journal.load_principles(), PrinciplesNote::Missing);

        let saved = journal.save_principles(" 추격 매수 금지 ").unwrap();
        assert_eq!(saved.as_deref(), Some("추격 매수 금지"));
        assert_eq!(journal.load_principles().text(), "추격 매수 금지");
        assert_eq!(journal.save_principles("추격 매수 금지\n").unwrap(), None);

        journal.clear_principles().unwrap();
        assert_eq!(journal.load_principles(), PrinciplesNote::Missing);
    }
}
