pub mod api;
pub mod automation;
pub mod config;
pub mod error;
