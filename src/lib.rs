//! Price and rating dashboard over a product listing export.
//!
//! The listing file is loaded and cleaned once ([`data::loader`]), filtered
//! per interaction ([`data::filter`]) and turned into chart and table specs
//! ([`view`]). [`state::InteractionController`] ties those together for one
//! session; [`server`] and the native [`app`] are two front ends over it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod server;
pub mod state;
pub mod ui;
pub mod view;
