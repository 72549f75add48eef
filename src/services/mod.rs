// src/services/mod.rs

pub mod auth_service;
pub mod metric_service;

pub use metric_service::{age_on, assess_bmi, classify, compute_bmi, BmiCategory};
