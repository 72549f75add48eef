//! Clinical records service: patients with scale (BMI) and temperature
//! readings behind cookie-session and bearer-token authentication.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

pub use api::build_router;
pub use config::Config;
pub use models::AppState;
