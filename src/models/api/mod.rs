pub mod params;
pub mod responses;

pub use params::{BasculaInput, LoginRequest, PacienteInput, RegistroRequest, TemperaturaInput};
pub use responses::{AuthResponse, BasculaView, PacienteView, VerificarResponse};
