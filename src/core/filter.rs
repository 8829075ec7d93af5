//! The filter pipeline — narrow the raw dataset to the rows matching the
//! current sidebar selections.
//!
//! A row survives only if every predicate holds, checked in this order:
//!
//! 1. it has a posting date inside the inclusive [`DateRange`];
//! 2. its starting salary is at least `min_salary`;
//! 3. its category matches the [`CategoryFilter`] exactly.
//!
//! Filtering never reorders or mutates rows.  An empty result is a valid
//! result, including when the range is inverted.

use chrono::{Days, NaiveDate};

use super::posting::{Dataset, JobPosting};

// ───────────────────────────────────────── types ─────────────

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `true` when `start > end`; such a range matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Category selection: everything, or one exact observed label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    Any,
    Specific(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Specific(wanted) => wanted == category,
        }
    }

    /// Label shown in the category selector.
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::Any => "All",
            CategoryFilter::Specific(c) => c,
        }
    }
}

/// The current selections of the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub date_range: DateRange,
    pub min_salary: f64,
    pub category: CategoryFilter,
}

/// Extents observed in the raw dataset.  Used for defaults and for clamping
/// the sidebar controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterBounds {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub salary_min: f64,
    pub salary_max: f64,
    /// Distinct categories in order of first appearance.
    pub categories: Vec<String>,
}

impl FilterBounds {
    /// Scan the dataset once.  An empty dataset yields salaries `0..=0`, no
    /// dates and no categories.
    pub fn observe(dataset: &Dataset) -> Self {
        let mut bounds = FilterBounds::default();
        let mut salary: Option<(f64, f64)> = None;

        for row in &dataset.rows {
            let s = row.salary_range_from;
            salary = Some(match salary {
                None => (s, s),
                Some((lo, hi)) => (lo.min(s), hi.max(s)),
            });

            if let Some(d) = row.posting_date {
                bounds.date_min = Some(bounds.date_min.map_or(d, |m| m.min(d)));
                bounds.date_max = Some(bounds.date_max.map_or(d, |m| m.max(d)));
            }

            if !bounds.categories.iter().any(|c| c == &row.job_category) {
                bounds.categories.push(row.job_category.clone());
            }
        }

        if let Some((lo, hi)) = salary {
            bounds.salary_min = lo;
            bounds.salary_max = hi;
        }
        bounds
    }
}

// ───────────────────────────────────────── filter state ──────

impl FilterState {
    /// Defaults: the full observed date range, the minimum observed salary,
    /// and every category.  Without any dated row the range collapses to
    /// `fallback..=fallback`.
    pub fn defaults_for(bounds: &FilterBounds, fallback: NaiveDate) -> Self {
        Self {
            date_range: DateRange::new(
                bounds.date_min.unwrap_or(fallback),
                bounds.date_max.unwrap_or(fallback),
            ),
            min_salary: bounds.salary_min,
            category: CategoryFilter::Any,
        }
    }

    /// The conjunction of all three predicates.
    pub fn matches(&self, row: &JobPosting) -> bool {
        let Some(date) = row.posting_date else {
            return false;
        };
        self.date_range.contains(date)
            && row.salary_range_from >= self.min_salary
            && self.category.matches(&row.job_category)
    }

    // ── sidebar edits ───────────────────────────────────────────

    /// Move the range start by `days` (may cross the end; the result is then
    /// simply empty).
    pub fn shift_start(&mut self, days: i64) {
        self.date_range.start = shift_date(self.date_range.start, days);
    }

    pub fn shift_end(&mut self, days: i64) {
        self.date_range.end = shift_date(self.date_range.end, days);
    }

    /// Set the salary threshold, clamped to the observed salary extent.  A
    /// non-finite value falls back to the observed minimum.
    pub fn set_min_salary(&mut self, value: f64, bounds: &FilterBounds) {
        let value = if value.is_finite() { value } else { bounds.salary_min };
        self.min_salary = value.clamp(bounds.salary_min, bounds.salary_max.max(bounds.salary_min));
    }

    /// Step the salary threshold, clamped to the observed salary extent.
    pub fn step_min_salary(&mut self, delta: f64, bounds: &FilterBounds) {
        self.set_min_salary(self.min_salary + delta, bounds);
    }

    /// Cycle `All → first → … → last → All` (or backwards).
    pub fn cycle_category(&mut self, forward: bool, bounds: &FilterBounds) {
        let n = bounds.categories.len();
        if n == 0 {
            self.category = CategoryFilter::Any;
            return;
        }
        // Position 0 is "All"; categories occupy 1..=n.
        let current = match &self.category {
            CategoryFilter::Any => 0,
            CategoryFilter::Specific(c) => bounds
                .categories
                .iter()
                .position(|x| x == c)
                .map_or(0, |i| i + 1),
        };
        let slots = n + 1;
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.category = match next {
            0 => CategoryFilter::Any,
            i => CategoryFilter::Specific(bounds.categories[i - 1].clone()),
        };
    }
}

fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(date)
}

// ───────────────────────────────────────── pipeline ──────────

/// Apply the filter to any sequence of rows, preserving their order.
pub fn apply<'a, I>(rows: I, state: &FilterState) -> Vec<&'a JobPosting>
where
    I: IntoIterator<Item = &'a JobPosting>,
{
    rows.into_iter().filter(|row| state.matches(row)).collect()
}

/// Same as [`apply`] but returns positions into `rows`.
pub fn apply_indices(rows: &[JobPosting], state: &FilterState) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| state.matches(row))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(category: &str, salary: f64, posted: Option<NaiveDate>) -> JobPosting {
        JobPosting {
            job_category: category.into(),
            salary_range_from: salary,
            posting_date: posted,
            ..Default::default()
        }
    }

    fn five_rows() -> Dataset {
        let salaries = [40_000.0, 50_000.0, 60_000.0, 70_000.0, 80_000.0];
        Dataset::new(
            salaries
                .iter()
                .enumerate()
                .map(|(i, &s)| row("Engineering", s, Some(date(2020, 1, 1 + i as u32))))
                .collect(),
        )
    }

    fn state_for(dataset: &Dataset) -> FilterState {
        FilterState::defaults_for(&FilterBounds::observe(dataset), date(2000, 1, 1))
    }

    #[test]
    fn min_salary_keeps_upper_rows_in_order() {
        let dataset = five_rows();
        let mut state = state_for(&dataset);
        state.min_salary = 60_000.0;

        let salaries: Vec<f64> = apply(&dataset.rows, &state)
            .iter()
            .map(|r| r.salary_range_from)
            .collect();
        assert_eq!(salaries, vec![60_000.0, 70_000.0, 80_000.0]);
    }

    #[test]
    fn undated_row_never_survives() {
        let mut dataset = five_rows();
        dataset.rows.push(row("Engineering", 99_000.0, None));
        let mut state = state_for(&dataset);
        state.date_range = DateRange::new(NaiveDate::MIN, NaiveDate::MAX);

        let kept = apply(&dataset.rows, &state);
        assert_eq!(kept.len(), 5);
        assert!(kept.iter().all(|r| r.posting_date.is_some()));
    }

    #[test]
    fn absent_category_yields_empty_result() {
        let dataset = five_rows();
        let mut state = state_for(&dataset);
        state.category = CategoryFilter::Specific("Astronautics".into());
        assert!(apply(&dataset.rows, &state).is_empty());
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let dataset = five_rows();
        let mut state = state_for(&dataset);
        state.category = CategoryFilter::Specific("engineering".into());
        assert!(apply(&dataset.rows, &state).is_empty());
    }

    #[test]
    fn literal_all_category_is_not_the_wildcard() {
        let dataset = Dataset::new(vec![
            row("All", 1.0, Some(date(2020, 1, 1))),
            row("Legal", 1.0, Some(date(2020, 1, 1))),
        ]);
        let mut state = state_for(&dataset);
        state.category = CategoryFilter::Specific("All".into());
        assert_eq!(apply(&dataset.rows, &state).len(), 1);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let dataset = five_rows();
        let mut state = state_for(&dataset);
        state.date_range = DateRange::new(date(2020, 1, 2), date(2020, 1, 4));
        assert_eq!(apply_indices(&dataset.rows, &state), vec![1, 2, 3]);
    }

    #[test]
    fn empty_dataset_bounds_default_to_zero() {
        let bounds = FilterBounds::observe(&Dataset::default());
        assert_eq!(bounds.salary_min, 0.0);
        assert_eq!(bounds.salary_max, 0.0);
        assert!(bounds.categories.is_empty());

        let state = FilterState::defaults_for(&bounds, date(2024, 5, 1));
        assert_eq!(state.min_salary, 0.0);
        assert_eq!(state.date_range, DateRange::new(date(2024, 5, 1), date(2024, 5, 1)));
        assert_eq!(state.category, CategoryFilter::Any);
    }

    #[test]
    fn bounds_ignore_undated_rows_for_dates_only() {
        let dataset = Dataset::new(vec![
            row("B", 10.0, None),
            row("A", 30.0, Some(date(2021, 6, 1))),
            row("B", 20.0, Some(date(2019, 2, 1))),
        ]);
        let bounds = FilterBounds::observe(&dataset);
        assert_eq!(bounds.date_min, Some(date(2019, 2, 1)));
        assert_eq!(bounds.date_max, Some(date(2021, 6, 1)));
        assert_eq!(bounds.salary_min, 10.0);
        assert_eq!(bounds.salary_max, 30.0);
        assert_eq!(bounds.categories, vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn salary_steps_clamp_to_observed_extent() {
        let dataset = five_rows();
        let bounds = FilterBounds::observe(&dataset);
        let mut state = state_for(&dataset);

        state.step_min_salary(-5_000.0, &bounds);
        assert_eq!(state.min_salary, 40_000.0);
        state.step_min_salary(25_000.0, &bounds);
        assert_eq!(state.min_salary, 65_000.0);
        state.step_min_salary(100_000.0, &bounds);
        assert_eq!(state.min_salary, 80_000.0);
    }

    #[test]
    fn non_finite_threshold_recovers_to_observed_minimum() {
        let dataset = five_rows();
        let bounds = FilterBounds::observe(&dataset);
        let mut state = state_for(&dataset);

        state.min_salary = f64::NAN;
        state.step_min_salary(5_000.0, &bounds);
        assert_eq!(state.min_salary, 40_000.0);

        state.set_min_salary(f64::INFINITY, &bounds);
        assert_eq!(state.min_salary, 40_000.0);
        state.set_min_salary(-10.0, &bounds);
        assert_eq!(state.min_salary, 40_000.0);
        state.set_min_salary(1e12, &bounds);
        assert_eq!(state.min_salary, 80_000.0);
    }

    #[test]
    fn category_cycle_wraps_through_all() {
        let bounds = FilterBounds {
            categories: vec!["A".into(), "B".into()],
            ..Default::default()
        };
        let mut state = FilterState::defaults_for(&bounds, date(2020, 1, 1));

        state.cycle_category(true, &bounds);
        assert_eq!(state.category, CategoryFilter::Specific("A".into()));
        state.cycle_category(true, &bounds);
        assert_eq!(state.category, CategoryFilter::Specific("B".into()));
        state.cycle_category(true, &bounds);
        assert_eq!(state.category, CategoryFilter::Any);
        state.cycle_category(false, &bounds);
        assert_eq!(state.category, CategoryFilter::Specific("B".into()));
    }

    #[test]
    fn shifting_dates_moves_by_days() {
        let mut state = FilterState::defaults_for(&FilterBounds::default(), date(2020, 3, 1));
        state.shift_start(-1);
        state.shift_end(30);
        assert_eq!(state.date_range.start, date(2020, 2, 29));
        assert_eq!(state.date_range.end, date(2020, 3, 31));
    }

    // ── properties ──────────────────────────────────────────────

    fn arb_row() -> impl Strategy<Value = JobPosting> {
        (
            prop_oneof![Just("A"), Just("B"), Just("C")],
            0u32..200_000,
            prop::option::weighted(0.9, 0u64..1_000),
        )
            .prop_map(|(cat, salary, offset)| {
                let posted = offset.and_then(|o| date(2018, 1, 1).checked_add_days(Days::new(o)));
                row(cat, f64::from(salary), posted)
            })
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            0u64..1_000,
            0u64..1_000,
            0u32..200_000,
            prop_oneof![
                Just(CategoryFilter::Any),
                Just(CategoryFilter::Specific("A".into())),
                Just(CategoryFilter::Specific("Z".into())),
            ],
        )
            .prop_map(|(a, b, salary, category)| {
                let base = date(2018, 1, 1);
                FilterState {
                    date_range: DateRange::new(base + Days::new(a), base + Days::new(b)),
                    min_salary: f64::from(salary),
                    category,
                }
            })
    }

    proptest! {
        #[test]
        fn output_is_an_ordered_subset(rows in prop::collection::vec(arb_row(), 0..60), state in arb_state()) {
            let kept = apply_indices(&rows, &state);
            prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(kept.iter().all(|&i| i < rows.len() && state.matches(&rows[i])));
        }

        #[test]
        fn filtering_is_idempotent(rows in prop::collection::vec(arb_row(), 0..60), state in arb_state()) {
            let once = apply(&rows, &state);
            let twice = apply(once.iter().copied(), &state);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn raising_min_salary_never_grows_result(
            rows in prop::collection::vec(arb_row(), 0..60),
            state in arb_state(),
            raise in 0u32..100_000,
        ) {
            let mut higher = state.clone();
            higher.min_salary += f64::from(raise);
            prop_assert!(apply(&rows, &higher).len() <= apply(&rows, &state).len());
        }

        #[test]
        fn inverted_range_is_always_empty(rows in prop::collection::vec(arb_row(), 0..60), state in arb_state()) {
            let mut inverted = state.clone();
            let DateRange { start, end } = state.date_range;
            inverted.date_range = if start == end {
                DateRange::new(start + Days::new(1), end)
            } else {
                DateRange::new(start.max(end), start.min(end))
            };
            prop_assert!(inverted.date_range.is_inverted());
            prop_assert!(apply(&rows, &inverted).is_empty());
        }
    }
}
