pub mod auth;
pub mod authorization;

pub use auth::*;
pub use authorization::*;
