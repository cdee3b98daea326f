//! Terminal front end: printing tables and writing the default config.

pub mod rates;
pub mod setup;
pub mod ui;
