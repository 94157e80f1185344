pub mod app;
pub mod logging;
pub mod realm;
pub mod settings;
pub mod theme;
pub mod types;
pub mod ui;
