//! Users domain - accounts, profile updates and admin lookups

pub mod models;

pub use models::{User, UserChanges};
