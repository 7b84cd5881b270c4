use eframe::egui::{self, Color32, RichText, Ui};

use crate::app::ListingsApp;
use crate::data::filter::RatingChoice;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, app: &mut ListingsApp) {
    ui.heading("Filters");
    ui.separator();

    let Some(session) = &app.session else {
        ui.label("No dataset loaded.");
        return;
    };
    let controls = session.dashboard().controls();
    let scale = session.current().scatter.scale();
    let bounds = controls.price_min..=controls.price_max;

    let mut changed = false;

    // ---- Price range ----
    ui.strong(format!("Price Range ({})", controls.currency));
    let (lo, hi) = &mut app.price_range;
    changed |= ui
        .add(
            egui::Slider::new(lo, bounds.clone())
                .step_by(controls.price_step)
                .text("from"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(hi, bounds)
                .step_by(controls.price_step)
                .text("to"),
        )
        .changed();
    if changed {
        app.price_range.1 = controls.snap_upper(app.price_range.1);
    }
    if ui.small_button("Full range").clicked() {
        app.price_range = (controls.price_min, controls.price_max);
        changed = true;
    }
    ui.separator();

    // ---- Minimum rating ----
    ui.strong("Minimum Rating");
    egui::ComboBox::from_id_salt("min_rating")
        .selected_text(app.rating_choice.label())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in RatingChoice::ALL {
                changed |= ui
                    .selectable_value(&mut app.rating_choice, choice, choice.label())
                    .changed();
            }
        });
    ui.separator();

    // ---- Colour legend for the scatter plot ----
    ui.strong("Rating colour scale");
    for (rating, color) in scale.legend_stops(5).into_iter().rev() {
        ui.label(RichText::new(format!("● {rating:.2}")).color(Color32::from(color)));
    }

    if changed {
        app.widgets_changed();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, app: &mut ListingsApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(app);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &app.session {
            let views = session.current();
            ui.label(format!(
                "{} listings loaded, {} matching",
                session.dashboard().table().len(),
                views.matched
            ));
            if let Some(err) = session.last_error() {
                ui.label(RichText::new(err.to_string()).color(Color32::YELLOW));
            }
        }

        if let Some(msg) = &app.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(app: &mut ListingsApp) {
    let file = rfd::FileDialog::new()
        .set_title("Open listing export")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        app.open(&path);
    }
}
