//! UI layer for desktop GUI: the production screen and its dialogs.

pub mod app;

pub use app::ProductionApp;
