//! Dashboard state: which result is shown, which tab, where the pointer is
//!
//! ```text
//!   Empty ──mount/reload──> Displaying
//!     │                        │
//!     └──begin_submission──> Loading ──submission_failed──> (previous state)
//!                              │
//!                              └──on_benchmark_updated──> Displaying
//! ```
//!
//! The controller never talks to the benchmark service. It learns about new
//! results through the persisted store, either on an explicit
//! [`Dashboard::on_benchmark_updated`] or by draining its event subscription.

use crate::chart::{self, ChartSurface, DrawCommand, HoverPoint};
use crate::data::{BenchmarkResult, HistoryEntry};
use crate::events::Subscription;
use crate::history::{HistoryStore, StateStore};
use crate::views::Tab;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Empty,
    Loading,
    Displaying,
}

pub struct Dashboard<S> {
    history: HistoryStore<S>,
    state: ViewState,
    state_before_loading: ViewState,
    active: Option<BenchmarkResult>,
    entries: Vec<HistoryEntry>,
    selected_id: Option<String>,
    tab: Tab,
    log_content: String,
    surface: ChartSurface,
    hover: Option<HoverPoint>,
    error: Option<String>,
    events: Option<Subscription>,
}

impl<S: StateStore> Dashboard<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            history,
            state: ViewState::Empty,
            state_before_loading: ViewState::Empty,
            active: None,
            entries: Vec::new(),
            selected_id: None,
            tab: Tab::default(),
            log_content: String::new(),
            surface: ChartSurface::default(),
            hover: None,
            error: None,
            events: None,
        }
    }

    /// Reload whenever `subscription` sees a notification (see [`Dashboard::poll_events`])
    pub fn with_events(mut self, subscription: Subscription) -> Self {
        self.events = Some(subscription);
        self
    }

    pub fn with_surface(mut self, surface: ChartSurface) -> Self {
        self.surface = surface;
        self
    }

    /// Load persisted history and current result
    pub fn mount(&mut self) {
        self.entries = self.history.load();

        match self.history.current() {
            Some(result) => {
                debug!("Loaded current result {}", result.benchmark_id);
                self.show(result);
            }
            None => {
                debug!("No current result persisted");
                self.active = None;
                self.selected_id = None;
                self.log_content.clear();
                self.hover = None;
                self.state = ViewState::Empty;
            }
        }
    }

    /// A submission is in flight
    pub fn begin_submission(&mut self) {
        if self.state != ViewState::Loading {
            self.state_before_loading = self.state;
        }
        self.error = None;
        self.state = ViewState::Loading;
    }

    /// The submission failed; keep whatever was displayed before
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("Benchmark submission failed: {}", message);
        self.error = Some(message);
        if self.state == ViewState::Loading {
            self.state = self.state_before_loading;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// A new result was persisted somewhere; reload everything from storage
    pub fn on_benchmark_updated(&mut self) {
        info!("Benchmark updated, reloading persisted state");
        self.mount();
    }

    /// Reload once if any notification arrived since the last poll
    pub fn poll_events(&mut self) -> bool {
        let updated = self.events.as_ref().is_some_and(Subscription::drain);
        if updated {
            self.on_benchmark_updated();
        }
        updated
    }

    /// Promote a history entry to the active result.
    ///
    /// Unknown ids (e.g. evicted entries) leave the selection untouched.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(entry) = self.entries.iter().find(|e| e.id == id).cloned() else {
            debug!("History entry {} not found, keeping selection", id);
            return false;
        };

        if let Err(e) = self.history.set_current(&entry.result) {
            warn!("Failed to persist selected result: {}", e);
        }

        self.show(entry.result);
        self.selected_id = Some(entry.id);
        true
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Pointer moved to `x` (surface pixels) over the chart
    pub fn pointer_move(&mut self, x: f64) -> Option<HoverPoint> {
        self.hover = self
            .active
            .as_ref()
            .filter(|r| !r.raw_stats.is_empty())
            .and_then(|r| chart::hover_at(&self.surface, &r.raw_stats, x));
        self.hover
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
    }

    /// Draw commands for the active result's chart, empty when nothing is shown
    pub fn chart(&self) -> Vec<DrawCommand> {
        match &self.active {
            Some(result) => chart::render(&self.surface, &result.raw_stats, self.hover.as_ref()),
            None => Vec::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn active(&self) -> Option<&BenchmarkResult> {
        self.active.as_ref()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn log_content(&self) -> &str {
        &self.log_content
    }

    pub fn hover(&self) -> Option<&HoverPoint> {
        self.hover.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn surface(&self) -> &ChartSurface {
        &self.surface
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    fn show(&mut self, result: BenchmarkResult) {
        self.selected_id = Some(result.benchmark_id.clone());
        self.log_content = result.logs.clone();
        self.hover = None;
        self.active = Some(result);
        self.state = ViewState::Displaying;
    }
}
