mod app;
pub mod cli;
mod desktop;
mod effects;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
