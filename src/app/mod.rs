pub mod actions;
pub mod controller;
pub mod controllers;
pub mod editor_store;
pub mod interaction;
pub mod settings;
pub mod state;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod test_support;

mod app;

pub use state::AppState;
