//! Presentation layer: the MVI core and the features built on it.

pub mod camera;
pub mod main;
pub mod map_scene;
pub mod mvi;
pub mod recent_searches;
pub mod search;
