// src/models/mod.rs

pub mod api;
pub mod app;
pub mod database;

pub use app::AppState;
