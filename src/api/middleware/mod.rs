pub mod auth_gate;
pub mod flash;
pub mod require_role;

pub use auth_gate::{auth_gate, AuthSource, AuthUser, Credential};
pub use flash::{flash_failures, load_flashes};
pub use require_role::{authorize, require_role, ADMIN_ONLY};
