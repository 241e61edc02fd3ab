pub mod analysis;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod files;
pub mod input;
pub mod logging;
pub mod nlp;
pub mod plugins;
pub mod providers;
pub mod services;
pub mod session;
pub mod system;
