// src/api/mod.rs

pub mod handler;
pub mod middleware;
pub mod router;

pub use router::build_router;
