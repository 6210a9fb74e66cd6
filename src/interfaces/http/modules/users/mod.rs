//! Users module: the signed-in user's profile, password and favourites

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
