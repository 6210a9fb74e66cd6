//! User aggregate
//!
//! Contains the User entity, repository inputs, and repository interface.

pub mod dto;
pub mod model;
pub mod repository;

pub use dto::{NewUser, UpdateProfile};
pub use model::{
    is_valid_name, is_valid_phone, User, UserRole, VehicleProfile, MAX_FAVORITE_STATIONS,
    MAX_VEHICLE_PROFILES,
};
pub use repository::UserRepository;
