//! Core functionality for entry storage, rendering, and configuration

pub mod config;
pub mod entry;
pub mod href;
pub mod markdown;
pub mod related;
pub mod store;
