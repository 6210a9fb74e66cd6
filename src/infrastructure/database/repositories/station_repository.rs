use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{from_json, to_json};
use crate::domain::station::{
    ConnectorType, GeoPoint, Station, StationFilter, StationRepository, StationState,
    StationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{station, station_status};
use crate::shared::errors::InfraError;
use crate::shared::{PageRequest, PaginatedResult};

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn station_model_to_domain(model: station::Model) -> DomainResult<Station> {
    let status = model
        .status
        .parse::<StationState>()
        .map_err(InfraError::InvalidData)?;

    Ok(Station {
        ports: from_json(&model.ports)?,
        location: GeoPoint {
            longitude: model.longitude,
            latitude: model.latitude,
        },
        id: model.id,
        name: model.name,
        operator_id: model.operator_id,
        address: model.address,
        operating_hours: model.operating_hours,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn station_to_active(station: &Station) -> DomainResult<station::ActiveModel> {
    Ok(station::ActiveModel {
        id: Set(station.id.clone()),
        name: Set(station.name.clone()),
        operator_id: Set(station.operator_id.clone()),
        longitude: Set(station.location.longitude),
        latitude: Set(station.location.latitude),
        address: Set(station.address.clone()),
        ports: Set(to_json(&station.ports)?),
        operating_hours: Set(station.operating_hours.clone()),
        status: Set(station.status.as_str().to_string()),
        created_at: Set(station.created_at),
        updated_at: Set(station.updated_at),
    })
}

fn status_model_to_domain(model: station_status::Model) -> DomainResult<StationStatus> {
    Ok(StationStatus {
        port_status: from_json(&model.port_status)?,
        id: model.id,
        station_id: model.station_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn status_to_active(status: &StationStatus) -> DomainResult<station_status::ActiveModel> {
    Ok(station_status::ActiveModel {
        id: Set(status.id.clone()),
        station_id: Set(status.station_id.clone()),
        port_status: Set(to_json(&status.port_status)?),
        created_at: Set(status.created_at),
        updated_at: Set(status.updated_at),
    })
}

fn filter_condition(filter: &StationFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(ref operator_id) = filter.operator_id {
        condition = condition.add(station::Column::OperatorId.eq(operator_id.as_str()));
    }
    if let Some(status) = filter.status {
        condition = condition.add(station::Column::Status.eq(status.as_str()));
    }
    if let Some(connector) = filter.connector_type {
        // Ports are stored as compact JSON, so the key/value pair is contiguous
        condition = condition.add(
            station::Column::Ports.contains(format!("\"connectorType\":\"{}\"", connector.as_str())),
        );
    }
    condition
}

async fn find_status_in<C: ConnectionTrait>(
    conn: &C,
    station_id: &str,
) -> DomainResult<Option<StationStatus>> {
    station_status::Entity::find()
        .filter(station_status::Column::StationId.eq(station_id))
        .one(conn)
        .await?
        .map(status_model_to_domain)
        .transpose()
}

/// Inserts the status record or rewrites its port entries
async fn upsert_status<C: ConnectionTrait>(conn: &C, status: &StationStatus) -> DomainResult<()> {
    let exists = station_status::Entity::find_by_id(status.id.as_str())
        .count(conn)
        .await?
        > 0;

    let mut active = status_to_active(status)?;
    if exists {
        active.station_id = sea_orm::ActiveValue::NotSet;
        active.created_at = sea_orm::ActiveValue::NotSet;
        active.update(conn).await?;
    } else {
        active.insert(conn).await?;
    }
    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn create(&self, station: &Station, status: &StationStatus) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        station_to_active(station)?.insert(&txn).await?;
        status_to_active(status)?.insert(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        station::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(station_model_to_domain)
            .transpose()
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        let count = station::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn list(
        &self,
        filter: &StationFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Station>> {
        let query = station::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(station::Column::CreatedAt)
            .order_by_asc(station::Column::Id);

        let total = query.clone().count(&self.db).await?;

        let items = query
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(station_model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn update(&self, station: &Station, status: Option<&StationStatus>) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        let mut active = station_to_active(station)?;
        // Ownership and creation time are immutable
        active.operator_id = sea_orm::ActiveValue::NotSet;
        active.created_at = sea_orm::ActiveValue::NotSet;
        active.update(&txn).await?;

        if let Some(status) = status {
            upsert_status(&txn, status).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        station_status::Entity::delete_many()
            .filter(station_status::Column::StationId.eq(id))
            .exec(&txn)
            .await?;

        let result = station::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            // Dropping the transaction rolls it back
            return Err(DomainError::not_found("station", id));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn find_status(&self, station_id: &str) -> DomainResult<Option<StationStatus>> {
        find_status_in(&self.db, station_id).await
    }

    async fn save_status(&self, status: &StationStatus) -> DomainResult<()> {
        let txn = self.db.begin().await?;
        upsert_status(&txn, status).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn update_occupancy(
        &self,
        station: &Station,
        connector: ConnectorType,
        occupied: u32,
    ) -> DomainResult<StationStatus> {
        let txn = self.db.begin().await?;

        let mut status = find_status_in(&txn, &station.id)
            .await?
            .unwrap_or_else(|| StationStatus::for_station(station));
        // A rejected count drops the transaction, which rolls it back
        status.set_occupied(station, connector, occupied)?;
        upsert_status(&txn, &status).await?;

        txn.commit().await?;
        Ok(status)
    }
}
