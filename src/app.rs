use std::path::Path;
use std::sync::Arc;

use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::filter::RatingChoice;
use crate::data::loader;
use crate::data::model::ProductTable;
use crate::state::{Dashboard, FilterInput, InteractionController};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ListingsApp {
    pub config: DashboardConfig,

    /// Controller for the loaded dataset (None until a file loads).
    pub session: Option<InteractionController>,

    /// Current widget values; pushed to the controller when they change.
    pub price_range: (f64, f64),
    pub rating_choice: RatingChoice,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ListingsApp {
    /// Start with the configured data file, if it loads.
    pub fn new(config: DashboardConfig) -> Self {
        let mut app = Self {
            config,
            session: None,
            price_range: (0.0, 0.0),
            rating_choice: RatingChoice::All,
            status_message: None,
        };
        let path = app.config.data_path.clone();
        app.open(&path);
        app
    }

    /// Load a listing file and replace the current session on success.
    pub fn open(&mut self, path: &Path) {
        match loader::load(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_table(&mut self, table: ProductTable) {
        let dashboard = Arc::new(Dashboard::new(
            table,
            self.config.view_settings(),
            self.config.price_step,
        ));
        let session = InteractionController::new(dashboard);
        let input = session.input();
        self.price_range = input.price_range;
        self.rating_choice = RatingChoice::All;
        self.session = Some(session);
        self.status_message = None;
    }

    /// Queue the current widget values.
    pub fn widgets_changed(&mut self) {
        if let Some(session) = &mut self.session {
            session.submit(FilterInput::new(self.price_range, self.rating_choice));
        }
    }
}

impl eframe::App for ListingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, self);
            });

        // Inputs from this frame collapse into one recompute.
        let views = self.session.as_mut().map(|session| {
            session.process();
            session.current()
        });

        // ---- Central panel: charts + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(views) = views else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a listing file to start  (File → Open…)");
                });
                return;
            };

            let chart_height = (ui.available_height() * 0.55).max(200.0);
            ui.columns(2, |cols| {
                plot::price_histogram(&mut cols[0], &views.histogram, chart_height);
                plot::price_rating_scatter(&mut cols[1], &views.scatter, chart_height);
            });
            ui.separator();
            table::top_products(ui, &views.top_table);
        });
    }
}
