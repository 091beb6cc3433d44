//! Skycast library
//!
//! Terminal weather client backed by OpenWeatherMap, with an offline
//! cache layer that keeps the last-seen data available without a network.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod format;
pub mod stores;
pub mod ui;
pub mod worker;
