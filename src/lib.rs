// src/lib.rs
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use config::Settings;
pub use error::FeedError;
