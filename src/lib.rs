//! Reactive core of a location-aware "places near me" client.
//!
//! Each screen feature is a [`ui::mvi::StateContainer`] driven by a
//! [`ui::mvi::FlowProcessor`]. Data sources are reached through the traits
//! in [`repo`].

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod ui;
