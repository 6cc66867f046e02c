pub mod alert;
pub mod app;
pub mod config;
pub mod logging;
pub mod mail;
pub mod ui;
pub mod worker;
