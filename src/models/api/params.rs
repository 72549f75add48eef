use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::database::{Bascula, MedicionBascula, MedicionTemperatura, NuevoPaciente, Paciente, Temperatura};

/// Plausible range for a body temperature reading, in °C.
pub const TEMPERATURA_MIN: f64 = 25.0;
pub const TEMPERATURA_MAX: f64 = 45.0;

#[derive(Debug, Deserialize)]
pub struct RegistroRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub rol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Patient body for both create (every field required) and update (any
/// subset, merged onto the stored row).
#[derive(Debug, Default, Deserialize)]
pub struct PacienteInput {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub sexo: Option<String>,
}

impl PacienteInput {
    pub fn into_nuevo(self, hoy: NaiveDate) -> AppResult<NuevoPaciente> {
        match (
            non_blank(self.nombre),
            non_blank(self.apellido),
            self.fecha_nacimiento,
            non_blank(self.sexo),
        ) {
            (Some(nombre), Some(apellido), Some(fecha_nacimiento), Some(sexo)) => validar_paciente(
                NuevoPaciente {
                    nombre,
                    apellido,
                    fecha_nacimiento,
                    sexo,
                },
                hoy,
            ),
            _ => Err(AppError::Validation(
                "Todos los campos son requeridos".to_string(),
            )),
        }
    }

    pub fn merge(self, actual: Paciente, hoy: NaiveDate) -> AppResult<NuevoPaciente> {
        validar_paciente(
            NuevoPaciente {
                nombre: non_blank(self.nombre).unwrap_or(actual.nombre),
                apellido: non_blank(self.apellido).unwrap_or(actual.apellido),
                fecha_nacimiento: self.fecha_nacimiento.unwrap_or(actual.fecha_nacimiento),
                sexo: non_blank(self.sexo).unwrap_or(actual.sexo),
            },
            hoy,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BasculaInput {
    pub paciente_id: Option<i64>,
    pub peso: Option<f64>,
    pub altura: Option<f64>,
    pub fecha_medicion: Option<DateTime<Utc>>,
}

impl BasculaInput {
    /// Returns the target patient id and the reading; a missing
    /// `fecha_medicion` becomes `ahora`.
    pub fn into_nueva(self, ahora: DateTime<Utc>) -> AppResult<(i64, MedicionBascula)> {
        let (Some(paciente_id), Some(peso), Some(altura)) = (self.paciente_id, self.peso, self.altura)
        else {
            return Err(AppError::Validation(
                "Paciente, peso y altura son requeridos".to_string(),
            ));
        };
        let medicion = validar_bascula(MedicionBascula {
            peso,
            altura,
            fecha_registro: self.fecha_medicion.unwrap_or(ahora),
        })?;
        Ok((paciente_id, medicion))
    }

    pub fn merge(self, actual: &Bascula) -> AppResult<MedicionBascula> {
        validar_bascula(MedicionBascula {
            peso: self.peso.unwrap_or(actual.peso),
            altura: self.altura.unwrap_or(actual.altura),
            fecha_registro: self.fecha_medicion.unwrap_or(actual.fecha_registro),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TemperaturaInput {
    pub paciente_id: Option<i64>,
    pub temperatura: Option<f64>,
    pub fecha_medicion: Option<DateTime<Utc>>,
}

impl TemperaturaInput {
    pub fn into_nueva(self, ahora: DateTime<Utc>) -> AppResult<(i64, MedicionTemperatura)> {
        let (Some(paciente_id), Some(temperatura)) = (self.paciente_id, self.temperatura) else {
            return Err(AppError::Validation(
                "Paciente y temperatura son requeridos".to_string(),
            ));
        };
        let medicion = validar_temperatura(MedicionTemperatura {
            temperatura,
            fecha_registro: self.fecha_medicion.unwrap_or(ahora),
        })?;
        Ok((paciente_id, medicion))
    }

    pub fn merge(self, actual: &Temperatura) -> AppResult<MedicionTemperatura> {
        validar_temperatura(MedicionTemperatura {
            temperatura: self.temperatura.unwrap_or(actual.temperatura),
            fecha_registro: self.fecha_medicion.unwrap_or(actual.fecha_registro),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validar_paciente(mut paciente: NuevoPaciente, hoy: NaiveDate) -> AppResult<NuevoPaciente> {
    paciente.sexo = paciente.sexo.to_uppercase();
    if paciente.sexo != "M" && paciente.sexo != "F" {
        return Err(AppError::Validation(
            "El sexo debe ser 'M' o 'F'".to_string(),
        ));
    }
    if paciente.fecha_nacimiento > hoy {
        return Err(AppError::Validation(
            "La fecha de nacimiento no puede ser futura".to_string(),
        ));
    }
    Ok(paciente)
}

fn validar_bascula(medicion: MedicionBascula) -> AppResult<MedicionBascula> {
    if !(medicion.peso.is_finite() && medicion.peso > 0.0) {
        return Err(AppError::Validation("Peso inválido".to_string()));
    }
    if !(medicion.altura.is_finite() && medicion.altura > 0.0) {
        return Err(AppError::Validation("Altura inválida".to_string()));
    }
    Ok(medicion)
}

fn validar_temperatura(medicion: MedicionTemperatura) -> AppResult<MedicionTemperatura> {
    let t = medicion.temperatura;
    if !t.is_finite() || !(TEMPERATURA_MIN..=TEMPERATURA_MAX).contains(&t) {
        return Err(AppError::Validation(format!(
            "La temperatura debe estar entre {} y {} °C",
            TEMPERATURA_MIN, TEMPERATURA_MAX
        )));
    }
    Ok(medicion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoy() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn paciente_requires_every_field() {
        let input = PacienteInput {
            nombre: Some("Juan".into()),
            apellido: Some("  ".into()),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1990, 5, 15),
            sexo: Some("M".into()),
        };
        assert!(matches!(input.into_nuevo(hoy()), Err(AppError::Validation(_))));
    }

    #[test]
    fn paciente_sexo_is_normalised_and_checked() {
        let input = PacienteInput {
            nombre: Some("María".into()),
            apellido: Some("García".into()),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1985, 10, 22),
            sexo: Some("f".into()),
        };
        assert_eq!(input.into_nuevo(hoy()).unwrap().sexo, "F");

        let input = PacienteInput {
            sexo: Some("X".into()),
            ..PacienteInput::default()
        };
        let actual = Paciente {
            id: 1,
            nombre: "María".into(),
            apellido: "García".into(),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1985, 10, 22).unwrap(),
            sexo: "F".into(),
        };
        assert!(input.merge(actual, hoy()).is_err());
    }

    #[test]
    fn bascula_defaults_timestamp_and_rejects_non_positive_values() {
        let ahora = Utc::now();
        let (paciente_id, medicion) = BasculaInput {
            paciente_id: Some(3),
            peso: Some(70.0),
            altura: Some(175.0),
            fecha_medicion: None,
        }
        .into_nueva(ahora)
        .unwrap();
        assert_eq!(paciente_id, 3);
        assert_eq!(medicion.fecha_registro, ahora);

        let err = BasculaInput {
            paciente_id: Some(3),
            peso: Some(0.0),
            altura: Some(175.0),
            fecha_medicion: None,
        }
        .into_nueva(ahora);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn bascula_merge_keeps_untouched_fields() {
        let actual = Bascula {
            id: 9,
            paciente_id: 3,
            peso: 70.0,
            altura: 175.0,
            fecha_registro: Utc::now(),
        };
        let merged = BasculaInput {
            peso: Some(95.0),
            ..BasculaInput::default()
        }
        .merge(&actual)
        .unwrap();
        assert_eq!(merged.peso, 95.0);
        assert_eq!(merged.altura, 175.0);
        assert_eq!(merged.fecha_registro, actual.fecha_registro);
    }

    #[test]
    fn temperatura_outside_range_is_rejected() {
        let input = TemperaturaInput {
            paciente_id: Some(1),
            temperatura: Some(370.0),
            fecha_medicion: None,
        };
        assert!(input.into_nueva(Utc::now()).is_err());
    }
}
