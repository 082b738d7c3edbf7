// Core modules
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod events;
pub mod infrastructure;
pub mod inquiry;
pub mod panels;
pub mod surface;
pub mod timeline;

pub use controller::PanelController;
pub use infrastructure::error::SiteError;
