use std::sync::Arc;

use crate::chart::{resolve, Charts};
use crate::data::model::{Field, RecordTable};
use crate::layout::{page_layout, PageLayout};
use crate::selector::{SelectorId, SelectorState};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Read-only customer table loaded at startup.
    pub table: Arc<RecordTable>,

    /// Static page description.
    pub layout: PageLayout,

    /// Current dropdown values.
    pub selectors: SelectorState,

    /// Charts for the current selector values, recomputed on every change.
    pub charts: Charts,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Show the selector state overlay.
    pub debug: bool,
}

impl AppState {
    pub fn new(table: Arc<RecordTable>, selectors: SelectorState, debug: bool) -> Self {
        let charts = resolve(&selectors, &table);
        Self {
            table,
            layout: page_layout(),
            selectors,
            charts,
            status_message: None,
            debug,
        }
    }

    /// Apply one selector change and recompute every chart.
    pub fn set_selector(&mut self, id: SelectorId, value: Option<Field>) {
        if self.selectors.get(id) == value {
            return;
        }
        match self.selectors.set(id, value) {
            Ok(()) => {
                log::debug!("{} → {:?}", id.as_str(), value);
                self.status_message = None;
                self.recompute();
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn recompute(&mut self) {
        self.charts = resolve(&self.selectors, &self.table);
        log::debug!(
            "Recomputed charts: distribution placeholder={}, segment placeholder={}",
            self.charts.distribution.is_placeholder(),
            self.charts.segment.is_placeholder()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    #[test]
    fn selector_change_recomputes_charts() {
        let mut state = AppState::new(Arc::new(sample_table()), SelectorState::default(), false);
        assert!(state.charts.segment.is_placeholder());

        state.set_selector(SelectorId::Segment, Some(Field::Job));
        assert!(!state.charts.segment.is_placeholder());
        assert_eq!(state.selectors.segment(), Some(Field::Job));

        state.set_selector(SelectorId::Segment, None);
        assert!(state.charts.segment.is_placeholder());
    }

    #[test]
    fn rejected_change_keeps_previous_charts() {
        let mut state = AppState::new(Arc::new(sample_table()), SelectorState::default(), false);
        let before = state.charts.clone();

        state.set_selector(SelectorId::Comparison, Some(Field::Job));
        assert_eq!(state.charts, before);
        assert_eq!(state.selectors.comparison(), Some(Field::Balance));
        assert!(state.status_message.is_some());
    }
}
