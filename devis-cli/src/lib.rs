pub mod config;
pub mod display;
pub mod logging;
pub mod output;
pub mod state;
