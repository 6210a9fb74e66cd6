//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.
//! Embedded lists are stored as JSON text columns.

pub mod repository_provider;
pub mod station_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use station_repository::SeaOrmStationRepository;
pub use user_repository::SeaOrmUserRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::DomainResult;

fn to_json<T: Serialize + ?Sized>(value: &T) -> DomainResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn from_json<T: DeserializeOwned>(raw: &str) -> DomainResult<T> {
    Ok(serde_json::from_str(raw)?)
}
