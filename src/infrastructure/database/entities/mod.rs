//! Database entities module

pub mod station;
pub mod station_status;
pub mod user;

pub use station::Entity as Station;
pub use station_status::Entity as StationStatus;
pub use user::Entity as User;
