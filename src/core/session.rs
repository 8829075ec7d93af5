//! Session-scoped context: the shared dataset plus one user's filter and page
//! state.
//!
//! Each session owns its own [`FilterState`] and [`PageState`]; only the
//! dataset behind the `Arc` is shared, and it is never mutated.  The filtered
//! view is stored as row positions and recomputed from the raw dataset on
//! every filter change.

use std::sync::Arc;

use chrono::NaiveDate;

use super::filter::{self, FilterBounds, FilterState};
use super::nav::{NavigationError, Page, PageState};
use super::posting::{Dataset, JobPosting};

pub struct Session {
    dataset: Arc<Dataset>,
    bounds: FilterBounds,
    filters: FilterState,
    page: PageState,
    filtered: Vec<usize>,
}

impl Session {
    /// Open a session with default filters (full range, lowest salary, all
    /// categories) on the first page.  `today` seeds the date range when the
    /// dataset has no dated rows.
    pub fn new(dataset: Arc<Dataset>, today: NaiveDate) -> Self {
        let bounds = FilterBounds::observe(&dataset);
        let filters = FilterState::defaults_for(&bounds, today);
        let mut session = Self {
            dataset,
            bounds,
            filters,
            page: PageState::default(),
            filtered: Vec::new(),
        };
        session.refilter();
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn bounds(&self) -> &FilterBounds {
        &self.bounds
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Replace the filter state and recompute the filtered view.
    pub fn set_filters(&mut self, filters: FilterState) {
        if filters != self.filters {
            self.filters = filters;
            self.refilter();
        }
    }

    /// Edit the filter state in place, then recompute.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterState, &FilterBounds)) {
        let mut next = self.filters.clone();
        edit(&mut next, &self.bounds);
        self.set_filters(next);
    }

    /// Restore the default selections.
    pub fn reset_filters(&mut self, today: NaiveDate) {
        self.set_filters(FilterState::defaults_for(&self.bounds, today));
    }

    /// Filtered rows in dataset order.
    pub fn filtered(&self) -> Vec<&JobPosting> {
        self.filtered.iter().map(|&i| &self.dataset.rows[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    // ── navigation ──────────────────────────────────────────────

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn page(&self) -> Result<Page, NavigationError> {
        self.page.page()
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = PageState::at(page);
    }

    pub fn previous_page(&mut self) {
        self.page.previous();
        tracing::debug!(page = self.page.number(), "navigated back");
    }

    pub fn next_page(&mut self) {
        self.page.next();
        tracing::debug!(page = self.page.number(), "navigated forward");
    }

    #[cfg(test)]
    pub(crate) fn corrupt_page(&mut self, n: u8) {
        self.page = PageState::corrupt(n);
    }

    fn refilter(&mut self) {
        let t0 = std::time::Instant::now();
        self.filtered = filter::apply_indices(&self.dataset.rows, &self.filters);
        tracing::debug!(
            "refilter: {:.2?} kept={} of {}",
            t0.elapsed(),
            self.filtered.len(),
            self.dataset.len()
        );
    }
}
