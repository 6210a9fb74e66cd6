pub mod repositories;
pub mod station;
pub mod user;

pub use repositories::{DomainResult, RepositoryProvider};
pub use station::{ConnectorType, Port, Station, StationState, StationStatus, VehicleType};
pub use user::{User, UserRole, VehicleProfile};

pub use crate::shared::errors::DomainError;
