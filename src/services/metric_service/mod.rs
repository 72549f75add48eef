//! Derived clinical metrics. Everything here is pure and recomputed on every
//! read; nothing is persisted.

pub mod age;
pub mod bmi;

pub use age::age_on;
pub use bmi::{assess_bmi, classify, compute_bmi, BmiCategory};
