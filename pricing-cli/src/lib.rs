pub mod app;
pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod utils;
