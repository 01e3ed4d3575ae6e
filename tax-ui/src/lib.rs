pub mod app;
pub mod config;
pub mod csv_loader;
pub mod debounce;
pub mod logging;
pub mod render;
pub mod utils;
