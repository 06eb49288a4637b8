//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from route handlers.

mod login;
mod register;

pub use login::{login, LoginResult};
pub use register::{register, validate_password, RegisterResult, MIN_PASSWORD_LENGTH};
