//! HTTP layer: forms, request workflows, pages and routing

pub mod forms;
pub mod handlers;
pub mod notify;
pub mod server;
pub mod views;

pub use server::{create_router, serve, AppState};
