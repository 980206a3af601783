//! One school's trend view: window navigation, fetch batches and the
//! committed matrix.
//!
//! Every navigation issues a [`LoadRequest`] tagged with a generation
//! number. Requests resolve independently; [`Dashboard::commit`] only
//! accepts the newest generation issued, so a slow batch for a window the
//! user already left can never overwrite a newer one.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::fetch::WellnessFetcher;
use crate::matrix;
use crate::models::{Dimension, MonthRow, RawMonthRecord, Slice, Summary};
use crate::month::MonthKey;
use crate::registry::DimensionRegistry;
use crate::trend::{self, MonthCursor};
use crate::window::{Window, WindowController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Nothing loaded yet, or no dimension has ever been reported.
    NoData,
    Ready,
}

#[derive(Debug, Clone)]
pub struct LoadRequest {
    generation: u64,
    school_id: String,
    window: Window,
}

impl LoadRequest {
    pub fn window(&self) -> Window {
        self.window
    }

    pub async fn resolve(self, fetcher: &WellnessFetcher) -> LoadedWindow {
        let raw = fetcher.fetch_window(&self.school_id, &self.window).await;
        LoadedWindow {
            generation: self.generation,
            window: self.window,
            raw,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedWindow {
    generation: u64,
    window: Window,
    raw: BTreeMap<MonthKey, RawMonthRecord>,
}

/// Everything a chart renderer needs for the committed window.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSnapshot {
    pub school_id: String,
    pub window: Option<Window>,
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<MonthRow>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    school_id: String,
    controller: WindowController,
    registry: DimensionRegistry,
    rows: Vec<MonthRow>,
    shown: Option<Window>,
    cursor: MonthCursor,
    issued: u64,
}

impl Dashboard {
    pub fn new(school_id: impl Into<String>, months_back: u32, current: MonthKey) -> Self {
        Self {
            school_id: school_id.into(),
            controller: WindowController::initialize(months_back, current),
            registry: DimensionRegistry::new(),
            rows: Vec::new(),
            shown: None,
            cursor: MonthCursor::latest(0),
            issued: 0,
        }
    }

    pub fn school_id(&self) -> &str {
        &self.school_id
    }

    /// Request for the window currently targeted, without moving it.
    pub fn request_current(&mut self) -> LoadRequest {
        let window = self.controller.window();
        self.issue(window)
    }

    pub fn show_previous(&mut self) -> LoadRequest {
        let window = self.controller.retreat();
        self.issue(window)
    }

    pub fn show_next(&mut self) -> LoadRequest {
        let window = self.controller.advance();
        self.issue(window)
    }

    fn issue(&mut self, window: Window) -> LoadRequest {
        self.issued += 1;
        debug!(
            school_id = %self.school_id,
            generation = self.issued,
            start = %window.start,
            end = %window.end,
            "issuing window load"
        );
        LoadRequest {
            generation: self.issued,
            school_id: self.school_id.clone(),
            window,
        }
    }

    /// Installs a resolved batch. Returns false when a newer request has
    /// been issued since, in which case the batch is dropped.
    pub fn commit(&mut self, loaded: LoadedWindow) -> bool {
        if loaded.generation != self.issued {
            debug!(
                school_id = %self.school_id,
                generation = loaded.generation,
                latest = self.issued,
                "discarding stale window load"
            );
            return false;
        }

        self.registry.register(loaded.raw.values());
        self.rows = matrix::build(&loaded.window, &loaded.raw, self.registry.dimensions());
        self.shown = Some(loaded.window);
        self.cursor = MonthCursor::latest(self.rows.len());

        info!(
            school_id = %self.school_id,
            start = %loaded.window.start,
            end = %loaded.window.end,
            dimensions = self.registry.len(),
            "wellness window loaded"
        );
        true
    }

    pub async fn load(&mut self, fetcher: &WellnessFetcher) -> bool {
        let request = self.request_current();
        let loaded = request.resolve(fetcher).await;
        self.commit(loaded)
    }

    pub async fn previous(&mut self, fetcher: &WellnessFetcher) -> bool {
        let request = self.show_previous();
        let loaded = request.resolve(fetcher).await;
        self.commit(loaded)
    }

    pub async fn next(&mut self, fetcher: &WellnessFetcher) -> bool {
        let request = self.show_next();
        let loaded = request.resolve(fetcher).await;
        self.commit(loaded)
    }

    pub fn state(&self) -> DisplayState {
        if self.shown.is_none() || self.registry.is_empty() {
            DisplayState::NoData
        } else {
            DisplayState::Ready
        }
    }

    /// Window of the committed rows.
    pub fn window(&self) -> Option<Window> {
        self.shown
    }

    pub fn rows(&self) -> &[MonthRow] {
        &self.rows
    }

    pub fn dimensions(&self) -> &[Dimension] {
        self.registry.dimensions()
    }

    pub fn snapshot(&self) -> TrendSnapshot {
        TrendSnapshot {
            school_id: self.school_id.clone(),
            window: self.shown,
            dimensions: self.registry.dimensions().to_vec(),
            rows: self.rows.clone(),
        }
    }

    /// The snapshot, or `None` while there is nothing to show.
    pub fn ready_snapshot(&self) -> Option<TrendSnapshot> {
        (self.state() == DisplayState::Ready).then(|| self.snapshot())
    }

    pub fn summary(&self, index: usize) -> Option<Summary> {
        self.rows
            .get(index)
            .map(|row| trend::summarize(row, self.registry.dimensions()))
    }

    pub fn breakdown(&self, index: usize) -> Option<Vec<Slice>> {
        self.rows
            .get(index)
            .map(|row| trend::breakdown(row, self.registry.dimensions()))
    }

    pub fn selected(&self) -> usize {
        self.cursor.index()
    }

    pub fn select_month(&mut self, index: usize) -> usize {
        self.cursor.select(index)
    }

    /// Like [`Dashboard::select_month`] but refuses an index past the last row.
    pub fn select_existing_month(&mut self, index: usize) -> Option<usize> {
        (index < self.rows.len()).then(|| self.cursor.select(index))
    }

    pub fn previous_month(&mut self) -> usize {
        self.cursor.step_back()
    }

    pub fn next_month(&mut self) -> usize {
        self.cursor.step_forward()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::fetch::testing::FakeSource;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn fetcher(source: FakeSource) -> WellnessFetcher {
        WellnessFetcher::new(Arc::new(source))
    }

    #[tokio::test]
    async fn empty_backend_is_no_data() {
        let fetcher = fetcher(FakeSource::default());
        let mut dashboard = Dashboard::new("1", 6, month("2025-10"));
        assert_eq!(dashboard.state(), DisplayState::NoData);

        assert!(dashboard.load(&fetcher).await);
        assert_eq!(dashboard.state(), DisplayState::NoData);
        assert_eq!(dashboard.rows().len(), 6);
        assert!(dashboard.rows().iter().all(|row| row.values.is_empty()));
        assert_eq!(dashboard.summary(0).unwrap().weakest.dimension, "N/A");
        assert!(dashboard.ready_snapshot().is_none());
    }

    #[tokio::test]
    async fn load_builds_dense_matrix_for_window() {
        let source = FakeSource::default()
            .with(
                "1",
                "2025-09",
                json!([{"dimension_name": "Emotional", "wellness_percentage": "70.5"}]),
            )
            .with(
                "1",
                "2025-10",
                json!([
                    {"dimension_name": "Physical", "wellness_percentage": 80},
                    {"dimension_name": "Emotional", "wellness_percentage": "N/A"}
                ]),
            );
        let fetcher = fetcher(source);
        let mut dashboard = Dashboard::new("1", 6, month("2025-10"));
        dashboard.load(&fetcher).await;

        assert_eq!(dashboard.state(), DisplayState::Ready);
        let rows = dashboard.rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].month, month("2025-05"));
        assert_eq!(rows[4].value("emotional"), Some(70.5));
        assert_eq!(rows[4].value("physical"), Some(0.0));
        assert_eq!(rows[5].value("emotional"), Some(0.0));
        assert_eq!(rows[5].value("physical"), Some(80.0));
        for row in rows {
            assert_eq!(row.keys().collect::<Vec<_>>(), vec!["emotional", "physical"]);
        }

        assert_eq!(dashboard.selected(), 5);
        let summary = dashboard.summary(dashboard.selected()).unwrap();
        assert_eq!(summary.overall, 40);
        assert_eq!(summary.weakest.dimension, "Emotional");
    }

    #[tokio::test]
    async fn dimensions_persist_across_windows() {
        let source = FakeSource::default()
            .with("1", "2025-10", json!([{"dimension_name": "Social", "wellness_percentage": 55}]))
            .with("1", "2025-01", json!([{"dimension_name": "Physical", "wellness_percentage": 60}]));
        let fetcher = fetcher(source);
        let mut dashboard = Dashboard::new("1", 6, month("2025-10"));
        dashboard.load(&fetcher).await;
        dashboard.previous(&fetcher).await;

        assert_eq!(
            dashboard.window(),
            Some(Window {
                start: month("2024-11"),
                end: month("2025-04"),
            })
        );
        let keys: Vec<&str> = dashboard.dimensions().iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["social", "physical"]);
        assert!(dashboard.rows().iter().all(|row| row.value("social") == Some(0.0)));
        assert_eq!(dashboard.rows()[2].value("physical"), Some(60.0));
    }

    #[tokio::test]
    async fn next_past_the_clamp_keeps_the_latest_window() {
        let fetcher = fetcher(FakeSource::default());
        let mut dashboard = Dashboard::new("1", 6, month("2025-10"));
        dashboard.load(&fetcher).await;
        dashboard.next(&fetcher).await;
        dashboard.next(&fetcher).await;
        assert_eq!(
            dashboard.window(),
            Some(Window {
                start: month("2025-05"),
                end: month("2025-10"),
            })
        );
    }

    #[tokio::test]
    async fn stale_batches_are_discarded() {
        let source = FakeSource::default()
            .with("1", "2025-04", json!([{"dimension_name": "Social", "wellness_percentage": 11}]))
            .with("1", "2025-10", json!([{"dimension_name": "Social", "wellness_percentage": 99}]));
        let fetcher = fetcher(source);
        let mut dashboard = Dashboard::new("1", 6, month("2025-10"));

        let back = dashboard.show_previous();
        let forward = dashboard.show_next();
        assert_eq!(forward.window().end, month("2025-10"));

        let newest = forward.resolve(&fetcher).await;
        let oldest = back.resolve(&fetcher).await;
        assert!(dashboard.commit(newest));
        assert!(!dashboard.commit(oldest));

        assert_eq!(dashboard.window().unwrap().end, month("2025-10"));
        assert_eq!(dashboard.rows()[5].value("social"), Some(99.0));
    }

    #[tokio::test]
    async fn month_cursor_clamps_to_rows() {
        let source = FakeSource::default()
            .with("1", "2025-10", json!([{"dimension_name": "Social", "wellness_percentage": 55}]));
        let fetcher = fetcher(source);
        let mut dashboard = Dashboard::new("1", 3, month("2025-10"));
        dashboard.load(&fetcher).await;

        assert_eq!(dashboard.next_month(), 2);
        assert_eq!(dashboard.previous_month(), 1);
        assert_eq!(dashboard.select_month(10), 2);
        let slices = dashboard.breakdown(2).unwrap();
        assert_eq!(slices[0].label, "Social");
        assert_eq!(slices[0].color, "#FACC15");
        assert!(dashboard.summary(3).is_none());
    }

    #[tokio::test]
    async fn exact_month_selection_rejects_out_of_range() {
        let source = FakeSource::default()
            .with("1", "2025-10", json!([{"dimension_name": "Social", "wellness_percentage": 55}]));
        let fetcher = fetcher(source);
        let mut dashboard = Dashboard::new("1", 3, month("2025-10"));
        assert_eq!(dashboard.select_existing_month(0), None);

        dashboard.load(&fetcher).await;
        assert_eq!(dashboard.select_existing_month(1), Some(1));
        assert_eq!(dashboard.select_existing_month(3), None);
        assert_eq!(dashboard.selected(), 1);
        let snapshot = dashboard.ready_snapshot().unwrap();
        assert_eq!(snapshot.rows.len(), 3);
        assert_eq!(snapshot.dimensions[0].label, "Social");
    }
}
