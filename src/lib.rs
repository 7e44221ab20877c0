//! WALS Explorer – interactive map of world-language typology data.
//!
//! Languages come from a [`data::source::LanguageSource`] (synthetic or a
//! JSON/CSV/Parquet file), are aggregated by the pure functions in [`data`],
//! and drawn with egui by [`app::WalsExplorerApp`].

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod projection;
pub mod state;
pub mod ui;
