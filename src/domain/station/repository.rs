//! Station repository interface

use async_trait::async_trait;

use super::dto::StationFilter;
use super::model::{ConnectorType, Station};
use super::status::StationStatus;
use crate::domain::DomainResult;
use crate::shared::{PageRequest, PaginatedResult};

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Inserts the station and its status record atomically
    async fn create(&self, station: &Station, status: &StationStatus) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>>;
    async fn exists(&self, id: &str) -> DomainResult<bool>;
    async fn list(
        &self,
        filter: &StationFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Station>>;

    /// Saves the station, and the status record when given, atomically.
    /// A status record that does not exist yet is inserted.
    async fn update(&self, station: &Station, status: Option<&StationStatus>) -> DomainResult<()>;

    /// Removes the station together with its status record
    async fn delete(&self, id: &str) -> DomainResult<()>;

    async fn find_status(&self, station_id: &str) -> DomainResult<Option<StationStatus>>;
    async fn save_status(&self, status: &StationStatus) -> DomainResult<()>;

    /// Reads, changes and writes the station's status record in one
    /// transaction, recreating the record when it is missing
    async fn update_occupancy(
        &self,
        station: &Station,
        connector: ConnectorType,
        occupied: u32,
    ) -> DomainResult<StationStatus>;
}
