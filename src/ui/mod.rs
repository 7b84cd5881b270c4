//! egui rendering for the native viewer.

pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::Color32;

use crate::color::Rgb8;

impl From<Rgb8> for Color32 {
    fn from(c: Rgb8) -> Self {
        Color32::from_rgb(c.r, c.g, c.b)
    }
}
