use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use crate::view::{format_rating, HistogramSpec, ScatterSpec};

// ---------------------------------------------------------------------------
// Price histogram
// ---------------------------------------------------------------------------

pub fn price_histogram(ui: &mut Ui, spec: &HistogramSpec, height: f32) {
    ui.strong(&spec.title);
    if spec.is_empty() {
        no_data(ui, height);
        return;
    }

    let bars: Vec<Bar> = spec
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.0} – {:.0}", bin.start, bin.end))
        })
        .collect();

    Plot::new("price_histogram")
        .height(height)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(99, 110, 250)));
        });
}

// ---------------------------------------------------------------------------
// Price vs. rating scatter
// ---------------------------------------------------------------------------

pub fn price_rating_scatter(ui: &mut Ui, spec: &ScatterSpec, height: f32) {
    ui.strong(&spec.title);
    if spec.points.is_empty() {
        no_data(ui, height);
        return;
    }

    // One series per distinct rating so each gets its own colour and legend row.
    let mut series: BTreeMap<i64, (f64, Color32, Vec<[f64; 2]>)> = BTreeMap::new();
    for p in &spec.points {
        let key = (p.rating * 100.0).round() as i64;
        series
            .entry(key)
            .or_insert_with(|| (p.rating, p.color.into(), Vec::new()))
            .2
            .push([p.price, p.rating]);
    }

    // Hover shows the product name of the point under the cursor.
    let labels: Vec<(f64, f64, String)> = spec
        .points
        .iter()
        .map(|p| (p.price, p.rating, p.name.clone()))
        .collect();

    Plot::new("price_vs_rating")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .label_formatter(move |_name, value| {
            labels
                .iter()
                .find(|(price, rating, _)| {
                    (price - value.x).abs() <= 1e-6 * value.x.abs().max(1.0)
                        && (rating - value.y).abs() <= 1e-6
                })
                .map(|(price, rating, name)| format!("{name}\n{price:.0}\n{rating}"))
                .unwrap_or_else(|| format!("{:.0}\n{:.2}", value.x, value.y))
        })
        .show(ui, |plot_ui| {
            for (rating, color, points) in series.into_values() {
                plot_ui.points(
                    Points::new(points)
                        .radius(4.0)
                        .color(color)
                        .name(format_rating(rating)),
                );
            }
        });
}

fn no_data(ui: &mut Ui, height: f32) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui| {
        ui.centered_and_justified(|ui| {
            ui.label("No data for the current filters");
        });
    });
}
