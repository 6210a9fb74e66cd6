//! Stations module: directory listing, operator inventory and occupancy

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
