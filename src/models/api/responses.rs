use chrono::NaiveDate;
use serde::Serialize;

use crate::models::database::{Bascula, Paciente, UsuarioPublico};
use crate::services::metric_service::{age_on, assess_bmi, BmiCategory};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub mensaje: &'static str,
    pub token: String,
    pub usuario: UsuarioPublico,
}

#[derive(Debug, Serialize)]
pub struct VerificarResponse {
    pub success: bool,
    pub autenticado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UsuarioPublico>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// Patient as returned by the API, with the derived age.
#[derive(Debug, Serialize)]
pub struct PacienteView {
    #[serde(flatten)]
    pub paciente: Paciente,
    pub edad: i32,
}

impl PacienteView {
    pub fn at(paciente: Paciente, hoy: NaiveDate) -> Self {
        let edad = age_on(paciente.fecha_nacimiento, hoy);
        PacienteView { paciente, edad }
    }
}

/// Scale reading as returned by the API. `imc` and `clasificacion` are
/// computed here, from the stored weight/height, on every read.
#[derive(Debug, Serialize)]
pub struct BasculaView {
    #[serde(flatten)]
    pub registro: Bascula,
    pub imc: Option<f64>,
    pub clasificacion: Option<BmiCategory>,
}

impl From<Bascula> for BasculaView {
    fn from(registro: Bascula) -> Self {
        let evaluacion = assess_bmi(Some(registro.peso), Some(registro.altura));
        BasculaView {
            registro,
            imc: evaluacion.map(|(imc, _)| imc),
            clasificacion: evaluacion.map(|(_, categoria)| categoria),
        }
    }
}
