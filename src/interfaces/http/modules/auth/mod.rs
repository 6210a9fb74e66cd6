//! Authentication module: signup and signin

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
