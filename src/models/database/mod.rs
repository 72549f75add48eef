pub mod bascula;
pub mod paciente;
pub mod session;
pub mod temperatura;
pub mod user;

pub use bascula::{Bascula, MedicionBascula};
pub use paciente::{NuevoPaciente, Paciente};
pub use session::{FlashKind, Flashes, SESSION_USER_KEY};
pub use temperatura::{MedicionTemperatura, Temperatura};
pub use user::{NuevoUsuario, Role, UnknownRole, Usuario, UsuarioPublico};
