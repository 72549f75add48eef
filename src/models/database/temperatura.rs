use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body temperature reading in degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Temperatura {
    pub id: i64,
    pub paciente_id: i64,
    pub temperatura: f64,
    pub fecha_registro: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicionTemperatura {
    pub temperatura: f64,
    pub fecha_registro: DateTime<Utc>,
}
