//! egui inference front end: controller/state/ui split.

pub mod controller;
pub mod state;
pub mod ui;
