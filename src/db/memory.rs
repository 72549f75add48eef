use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{BasculaStore, PacienteStore, StoreError, StoreResult, TemperaturaStore, UserStore};
use crate::models::database::{
    Bascula, MedicionBascula, MedicionTemperatura, NuevoPaciente, NuevoUsuario, Paciente,
    Temperatura, Usuario,
};

/// Process-local store. All tables sit behind one lock so a uniqueness check
/// and its insert, or a delete and its cascade, happen atomically.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    usuarios: BTreeMap<i64, Usuario>,
    pacientes: BTreeMap<i64, Paciente>,
    basculas: BTreeMap<i64, Bascula>,
    temperaturas: BTreeMap<i64, Temperatura>,
    usuario_seq: i64,
    paciente_seq: i64,
    bascula_seq: i64,
    temperatura_seq: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Usuario>> {
        Ok(self.tables.read().await.usuarios.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Usuario>> {
        let tables = self.tables.read().await;
        Ok(tables
            .usuarios
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, nuevo: NuevoUsuario) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if tables.usuarios.values().any(|u| u.username == nuevo.username) {
            return Err(StoreError::Conflict("usuarios_username_key".to_string()));
        }
        let id = next(&mut tables.usuario_seq);
        tables.usuarios.insert(
            id,
            Usuario {
                id,
                username: nuevo.username,
                email: nuevo.email,
                password_hash: nuevo.password_hash,
                rol: nuevo.rol,
            },
        );
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<Usuario>> {
        Ok(self.tables.read().await.usuarios.values().cloned().collect())
    }
}

#[async_trait]
impl PacienteStore for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<Paciente>> {
        Ok(self.tables.read().await.pacientes.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Paciente>> {
        Ok(self.tables.read().await.pacientes.get(&id).cloned())
    }

    async fn create(&self, nuevo: NuevoPaciente) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.paciente_seq);
        tables.pacientes.insert(
            id,
            Paciente {
                id,
                nombre: nuevo.nombre,
                apellido: nuevo.apellido,
                fecha_nacimiento: nuevo.fecha_nacimiento,
                sexo: nuevo.sexo,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, datos: NuevoPaciente) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(paciente) = tables.pacientes.get_mut(&id) else {
            return Ok(false);
        };
        paciente.nombre = datos.nombre;
        paciente.apellido = datos.apellido;
        paciente.fecha_nacimiento = datos.fecha_nacimiento;
        paciente.sexo = datos.sexo;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.pacientes.remove(&id).is_none() {
            return Ok(false);
        }
        tables.basculas.retain(|_, b| b.paciente_id != id);
        tables.temperaturas.retain(|_, t| t.paciente_id != id);
        Ok(true)
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl BasculaStore for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<Bascula>> {
        let mut rows: Vec<Bascula> = self.tables.read().await.basculas.values().cloned().collect();
        newest_first(&mut rows, |b| (b.fecha_registro, b.id));
        Ok(rows)
    }

    async fn list_by_paciente(&self, paciente_id: i64) -> StoreResult<Vec<Bascula>> {
        let mut rows: Vec<Bascula> = self
            .tables
            .read()
            .await
            .basculas
            .values()
            .filter(|b| b.paciente_id == paciente_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |b| (b.fecha_registro, b.id));
        Ok(rows)
    }

    async fn latest_for_paciente(&self, paciente_id: i64) -> StoreResult<Option<Bascula>> {
        Ok(BasculaStore::list_by_paciente(self, paciente_id)
            .await?
            .into_iter()
            .next())
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Bascula>> {
        Ok(self.tables.read().await.basculas.get(&id).cloned())
    }

    async fn create(&self, paciente_id: i64, medicion: MedicionBascula) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if !tables.pacientes.contains_key(&paciente_id) {
            return Err(StoreError::MissingReference(
                "basculas_paciente_id_fkey".to_string(),
            ));
        }
        let id = next(&mut tables.bascula_seq);
        tables.basculas.insert(
            id,
            Bascula {
                id,
                paciente_id,
                peso: medicion.peso,
                altura: medicion.altura,
                fecha_registro: medicion.fecha_registro,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, medicion: MedicionBascula) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(registro) = tables.basculas.get_mut(&id) else {
            return Ok(false);
        };
        registro.peso = medicion.peso;
        registro.altura = medicion.altura;
        registro.fecha_registro = medicion.fecha_registro;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.basculas.remove(&id).is_some())
    }
}

#[async_trait]
impl TemperaturaStore for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<Temperatura>> {
        let mut rows: Vec<Temperatura> = self
            .tables
            .read()
            .await
            .temperaturas
            .values()
            .cloned()
            .collect();
        newest_first(&mut rows, |t| (t.fecha_registro, t.id));
        Ok(rows)
    }

    async fn list_by_paciente(&self, paciente_id: i64) -> StoreResult<Vec<Temperatura>> {
        let mut rows: Vec<Temperatura> = self
            .tables
            .read()
            .await
            .temperaturas
            .values()
            .filter(|t| t.paciente_id == paciente_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |t| (t.fecha_registro, t.id));
        Ok(rows)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Temperatura>> {
        Ok(self.tables.read().await.temperaturas.get(&id).cloned())
    }

    async fn create(&self, paciente_id: i64, medicion: MedicionTemperatura) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if !tables.pacientes.contains_key(&paciente_id) {
            return Err(StoreError::MissingReference(
                "temperaturas_paciente_id_fkey".to_string(),
            ));
        }
        let id = next(&mut tables.temperatura_seq);
        tables.temperaturas.insert(
            id,
            Temperatura {
                id,
                paciente_id,
                temperatura: medicion.temperatura,
                fecha_registro: medicion.fecha_registro,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, medicion: MedicionTemperatura) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(registro) = tables.temperaturas.get_mut(&id) else {
            return Ok(false);
        };
        registro.temperatura = medicion.temperatura;
        registro.fecha_registro = medicion.fecha_registro;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.temperaturas.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::database::Role;
    use chrono::{Duration, NaiveDate, Utc};
    use std::sync::Arc;

    fn nuevo_usuario(username: &str) -> NuevoUsuario {
        NuevoUsuario {
            username: username.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            email: format!("{}@x.com", username),
            rol: Role::User,
        }
    }

    fn nuevo_paciente() -> NuevoPaciente {
        NuevoPaciente {
            nombre: "Juan".to_string(),
            apellido: "Pérez".to_string(),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            sexo: "M".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = InMemoryStore::new();
        UserStore::create(&store, nuevo_usuario("ana")).await.unwrap();
        let err = UserStore::create(&store, nuevo_usuario("ana")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn username_match_is_case_sensitive() {
        let store = InMemoryStore::new();
        UserStore::create(&store, nuevo_usuario("ana")).await.unwrap();
        assert!(store.find_by_username("Ana").await.unwrap().is_none());
        UserStore::create(&store, nuevo_usuario("Ana")).await.unwrap();
    }

    #[tokio::test]
    async fn racing_inserts_of_the_same_username_yield_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { UserStore::create(&*store, nuevo_usuario("ana")).await })
            })
            .collect();
        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn deleting_a_patient_cascades_to_measurements() {
        let store = InMemoryStore::new();
        let paciente_id = PacienteStore::create(&store, nuevo_paciente()).await.unwrap();
        let bascula_id = BasculaStore::create(
            &store,
            paciente_id,
            MedicionBascula {
                peso: 70.0,
                altura: 175.0,
                fecha_registro: Utc::now(),
            },
        )
        .await
        .unwrap();

        assert!(PacienteStore::delete(&store, paciente_id).await.unwrap());
        assert!(BasculaStore::find(&store, bascula_id).await.unwrap().is_none());
        assert!(!PacienteStore::delete(&store, paciente_id).await.unwrap());
    }

    #[tokio::test]
    async fn measurement_for_unknown_patient_is_rejected() {
        let store = InMemoryStore::new();
        let err = TemperaturaStore::create(
            &store,
            42,
            MedicionTemperatura {
                temperatura: 36.5,
                fecha_registro: Utc::now(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[tokio::test]
    async fn latest_reading_is_the_newest_by_date() {
        let store = InMemoryStore::new();
        let paciente_id = PacienteStore::create(&store, nuevo_paciente()).await.unwrap();
        let now = Utc::now();
        for (dias, peso) in [(3, 70.0), (1, 72.0), (2, 71.0)] {
            BasculaStore::create(
                &store,
                paciente_id,
                MedicionBascula {
                    peso,
                    altura: 175.0,
                    fecha_registro: now - Duration::days(dias),
                },
            )
            .await
            .unwrap();
        }
        let latest = store.latest_for_paciente(paciente_id).await.unwrap().unwrap();
        assert_eq!(latest.peso, 72.0);

        let pesos: Vec<f64> = BasculaStore::list_by_paciente(&store, paciente_id)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.peso)
            .collect();
        assert_eq!(pesos, vec![72.0, 71.0, 70.0]);
    }
}
