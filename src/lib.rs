//! Palmer Penguins dashboard.
//!
//! The data layer ([`data`]), selection types ([`selection`]), reactive
//! runtime ([`reactive`]), per-user [`session`] and chart models ([`chart`])
//! have no UI dependency and are tested on their own; [`app`] and [`ui`]
//! draw them with egui.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod reactive;
pub mod selection;
pub mod session;
pub mod ui;
