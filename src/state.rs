use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::filter::{filter, FilterCriteria, FilteredView, RatingChoice};
use crate::data::model::ProductTable;
use crate::error::CriteriaError;
use crate::view::{build_views, HistogramSpec, ScatterSpec, TopTable, ViewSettings};

// ---------------------------------------------------------------------------
// Widget input
// ---------------------------------------------------------------------------

/// Raw values of the two input widgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterInput {
    /// Both handles of the range slider, in either order.
    pub price_range: (f64, f64),
    pub min_rating: f64,
}

impl FilterInput {
    pub fn new(price_range: (f64, f64), choice: RatingChoice) -> Self {
        Self {
            price_range,
            min_rating: choice.min_rating(),
        }
    }

    /// Order the slider handles and validate.
    pub fn to_criteria(&self) -> Result<FilterCriteria, CriteriaError> {
        let (a, b) = self.price_range;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        FilterCriteria::new(lo, hi, self.min_rating)
    }
}

// ---------------------------------------------------------------------------
// Output bundle
// ---------------------------------------------------------------------------

/// Everything one interaction displays. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    /// Sequence number of the input that produced these views.
    pub generation: u64,
    /// Records matching the criteria (before top-N truncation).
    pub matched: usize,
    pub histogram: HistogramSpec,
    pub scatter: ScatterSpec,
    pub top_table: TopTable,
    /// `top_table` rendered for the web page.
    pub table_html: String,
}

impl DashboardViews {
    fn from_view(generation: u64, view: &FilteredView<'_>, settings: &ViewSettings) -> Self {
        let (histogram, scatter, top_table) = build_views(view, settings);
        let table_html = top_table.to_html();
        Self {
            generation,
            matched: view.len(),
            histogram,
            scatter,
            top_table,
            table_html,
        }
    }
}

// ---------------------------------------------------------------------------
// Process-wide dashboard
// ---------------------------------------------------------------------------

/// One selectable rating option, as sent to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingOption {
    pub label: &'static str,
    pub value: f64,
}

/// Bounds and options for the input widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsSpec {
    pub price_min: f64,
    pub price_max: f64,
    pub price_step: f64,
    pub rating_options: Vec<RatingOption>,
    pub currency: String,
}

impl ControlsSpec {
    /// Stepped sliders stop short of the true maximum; an upper handle within
    /// one step of it stands for the maximum itself.
    pub fn snap_upper(&self, hi: f64) -> f64 {
        if hi + self.price_step > self.price_max {
            self.price_max
        } else {
            hi
        }
    }
}

/// The loaded table plus view settings. Read-only after startup and shared
/// by every session.
#[derive(Debug)]
pub struct Dashboard {
    table: ProductTable,
    settings: ViewSettings,
    price_step: f64,
}

impl Dashboard {
    pub fn new(table: ProductTable, settings: ViewSettings, price_step: f64) -> Self {
        Self {
            table,
            settings,
            price_step,
        }
    }

    pub fn table(&self) -> &ProductTable {
        &self.table
    }

    /// Slider bounds rounded outward to whole currency units.
    pub fn controls(&self) -> ControlsSpec {
        let (lo, hi) = self.table.price_bounds().unwrap_or((0.0, 0.0));
        ControlsSpec {
            price_min: lo.floor(),
            price_max: hi.ceil(),
            price_step: self.price_step,
            rating_options: RatingChoice::ALL
                .iter()
                .map(|c| RatingOption {
                    label: c.label(),
                    value: c.min_rating(),
                })
                .collect(),
            currency: self.settings.currency.clone(),
        }
    }

    /// The widget state a fresh session starts from: full range, all ratings.
    pub fn initial_input(&self) -> FilterInput {
        let controls = self.controls();
        FilterInput::new((controls.price_min, controls.price_max), RatingChoice::All)
    }

    /// Filter and build all three views for one set of criteria.
    pub fn render(&self, criteria: &FilterCriteria, generation: u64) -> DashboardViews {
        let view = filter(&self.table, criteria);
        DashboardViews::from_view(generation, &view, &self.settings)
    }

    /// The "no data" state shown when an input cannot be turned into criteria.
    pub fn render_empty(&self, generation: u64) -> DashboardViews {
        DashboardViews::from_view(generation, &FilteredView::empty(&self.table), &self.settings)
    }
}

// ---------------------------------------------------------------------------
// Interaction controller (one per session)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Computing,
}

/// Turns widget input into displayed views for one session.
///
/// Inputs are queued with [`submit`](Self::submit); a newer input replaces a
/// pending one. [`process`](Self::process) computes the latest pending input
/// and swaps the displayed views in one assignment, so readers of
/// [`current`](Self::current) never see views from two different inputs.
pub struct InteractionController {
    dashboard: Arc<Dashboard>,
    phase: Phase,
    pending: Option<(u64, FilterInput)>,
    last_generation: u64,
    input: FilterInput,
    current: Arc<DashboardViews>,
    last_error: Option<CriteriaError>,
}

impl InteractionController {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        let input = dashboard.initial_input();
        let current = match input.to_criteria() {
            Ok(criteria) => dashboard.render(&criteria, 0),
            Err(_) => dashboard.render_empty(0),
        };
        Self {
            dashboard,
            phase: Phase::Idle,
            pending: None,
            last_generation: 0,
            input,
            current: Arc::new(current),
            last_error: None,
        }
    }

    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The input behind the most recently displayed views.
    pub fn input(&self) -> FilterInput {
        self.input
    }

    pub fn current(&self) -> Arc<DashboardViews> {
        Arc::clone(&self.current)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Error from the last processed input, if it was rejected.
    pub fn last_error(&self) -> Option<&CriteriaError> {
        self.last_error.as_ref()
    }

    /// Queue an input; returns its generation number.
    pub fn submit(&mut self, input: FilterInput) -> u64 {
        self.last_generation += 1;
        if let Some((superseded, _)) = self.pending.replace((self.last_generation, input)) {
            log::trace!("input {superseded} superseded by {}", self.last_generation);
        }
        self.last_generation
    }

    /// Compute the pending input, if any, and swap in its views.
    pub fn process(&mut self) -> Option<Arc<DashboardViews>> {
        let (generation, input) = self.pending.take()?;
        self.phase = Phase::Computing;

        let views = match input.to_criteria() {
            Ok(criteria) => {
                self.last_error = None;
                self.dashboard.render(&criteria, generation)
            }
            Err(e) => {
                log::warn!("Rejected filter input {input:?}: {e}");
                self.last_error = Some(e);
                self.dashboard.render_empty(generation)
            }
        };

        self.input = input;
        self.current = Arc::new(views);
        self.phase = Phase::Idle;
        Some(self.current())
    }

    /// Submit and process in one step.
    pub fn update(&mut self, input: FilterInput) -> Arc<DashboardViews> {
        self.submit(input);
        self.process().unwrap_or_else(|| self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ProductRecord;

    fn dashboard() -> Arc<Dashboard> {
        let table = ProductTable::from_records(vec![
            ProductRecord::new("cheap", 4_000.0, 4.5),
            ProductRecord::new("mid", 10_000.0, 4.8),
            ProductRecord::new("premium", 20_000.0, 5.0),
            ProductRecord::new("budget", 6_500.5, 3.9),
        ]);
        Arc::new(Dashboard::new(table, ViewSettings::default(), 1000.0))
    }

    #[test]
    fn upper_handle_snaps_to_true_maximum() {
        let table = ProductTable::from_records(vec![
            ProductRecord::new("low", 4_000.0, 4.0),
            ProductRecord::new("top", 20_450.0, 4.0),
        ]);
        let controls = Dashboard::new(table, ViewSettings::default(), 1000.0).controls();
        // The slider can only reach 4000 + 16 * 1000.
        assert_eq!(controls.snap_upper(20_000.0), 20_450.0);
        assert_eq!(controls.snap_upper(19_000.0), 19_000.0);
        assert_eq!(controls.snap_upper(20_450.0), 20_450.0);
    }

    #[test]
    fn starts_with_everything_visible() {
        let controller = InteractionController::new(dashboard());
        let views = controller.current();
        assert_eq!(views.generation, 0);
        assert_eq!(views.matched, 4);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.input().price_range, (4_000.0, 20_000.0));
    }

    #[test]
    fn update_replaces_all_views() {
        let mut controller = InteractionController::new(dashboard());
        let views = controller.update(FilterInput::new((5_000.0, 15_000.0), RatingChoice::AtLeastFour));
        assert_eq!(views.matched, 1);
        assert_eq!(views.scatter.points.len(), 1);
        assert_eq!(views.histogram.total(), 1);
        assert_eq!(views.top_table.rows[0].name, "mid");
        assert!(views.table_html.contains("mid"));
        assert_eq!(controller.current(), views);
    }

    #[test]
    fn latest_input_wins() {
        let mut controller = InteractionController::new(dashboard());
        controller.submit(FilterInput::new((0.0, 5_000.0), RatingChoice::All));
        controller.submit(FilterInput::new((0.0, 50_000.0), RatingChoice::FiveOnly));
        let last = controller.submit(FilterInput::new((0.0, 50_000.0), RatingChoice::AtLeastFourHalf));
        assert!(controller.has_pending());

        let views = controller.process().unwrap();
        assert_eq!(views.generation, last);
        assert_eq!(views.matched, 3);
        assert!(!controller.has_pending());
        assert!(controller.process().is_none());
        assert_eq!(controller.current().generation, last);
    }

    #[test]
    fn reversed_slider_handles_are_ordered() {
        let mut controller = InteractionController::new(dashboard());
        let views = controller.update(FilterInput::new((15_000.0, 5_000.0), RatingChoice::All));
        assert_eq!(views.matched, 2);
    }

    #[test]
    fn invalid_input_degrades_to_empty_views() {
        let mut controller = InteractionController::new(dashboard());
        let views = controller.update(FilterInput {
            price_range: (0.0, f64::NAN),
            min_rating: 0.0,
        });
        assert_eq!(views.matched, 0);
        assert!(views.histogram.bins.is_empty());
        assert!(views.top_table.is_empty());
        assert!(controller.last_error().is_some());
        assert_eq!(controller.phase(), Phase::Idle);

        controller.update(FilterInput::new((0.0, 50_000.0), RatingChoice::All));
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn controls_round_outward() {
        let controls = dashboard().controls();
        assert_eq!((controls.price_min, controls.price_max), (4_000.0, 20_000.0));
        assert_eq!(controls.rating_options.len(), 4);
        assert_eq!(controls.rating_options[0].value, 0.0);
        assert_eq!(controls.rating_options[3].label, "5.0 only");
    }

    #[test]
    fn empty_table_is_served_without_error() {
        let dashboard = Arc::new(Dashboard::new(
            ProductTable::default(),
            ViewSettings::default(),
            1000.0,
        ));
        let controller = InteractionController::new(dashboard);
        let views = controller.current();
        assert_eq!(views.matched, 0);
        assert!(views.table_html.contains("<caption>"));
    }
}
