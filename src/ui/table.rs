use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::view::TopTable;

/// Render the top-rated listings.
pub fn top_products(ui: &mut Ui, table: &TopTable) {
    ui.strong(format!("Top {} by rating", table.len()));
    if table.is_empty() {
        ui.label("No products match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::exact(28.0))
        .column(Column::initial(320.0).at_least(120.0).resizable(true).clip(true))
        .column(Column::initial(130.0).resizable(true))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for title in table.columns {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &table.rows {
                body.row(18.0, |mut cells| {
                    cells.col(|ui| {
                        ui.label(row.rank.to_string());
                    });
                    cells.col(|ui| {
                        ui.label(&row.name);
                    });
                    cells.col(|ui| {
                        ui.label(&row.price_text);
                    });
                    cells.col(|ui| {
                        ui.label(&row.rating_text);
                    });
                });
            }
        });
}
