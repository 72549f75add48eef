use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scale reading: weight in kilograms, height in centimetres.
///
/// BMI is never stored here; it is derived from `peso`/`altura` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bascula {
    pub id: i64,
    pub paciente_id: i64,
    pub peso: f64,
    pub altura: f64,
    pub fecha_registro: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicionBascula {
    pub peso: f64,
    pub altura: f64,
    pub fecha_registro: DateTime<Utc>,
}
