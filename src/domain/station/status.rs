//! Live occupancy per connector type, one record per station

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::{ConnectorType, Station};
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortStatus {
    pub connector_type: ConnectorType,
    pub occupied: u32,
}

#[derive(Debug, Clone)]
pub struct StationStatus {
    pub id: String,
    pub station_id: String,
    pub port_status: Vec<PortStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StationStatus {
    /// Fresh record with nothing occupied
    pub fn for_station(station: &Station) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            station_id: station.id.clone(),
            port_status: station
                .connector_types()
                .into_iter()
                .map(|connector_type| PortStatus {
                    connector_type,
                    occupied: 0,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Aligns the entries with the station's current ports.
    ///
    /// Entries for removed connector types are dropped, surviving counts are
    /// clamped to the new capacity and new types are appended at zero.
    /// Returns whether anything changed.
    pub fn reconcile(&mut self, station: &Station) -> bool {
        let types = station.connector_types();
        let before = self.port_status.clone();

        self.port_status.retain(|e| types.contains(&e.connector_type));
        for entry in &mut self.port_status {
            entry.occupied = entry.occupied.min(station.capacity(entry.connector_type));
        }
        for connector_type in types {
            if !self
                .port_status
                .iter()
                .any(|e| e.connector_type == connector_type)
            {
                self.port_status.push(PortStatus {
                    connector_type,
                    occupied: 0,
                });
            }
        }

        let changed = before != self.port_status;
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn occupied(&self, connector: ConnectorType) -> u32 {
        self.port_status
            .iter()
            .find(|e| e.connector_type == connector)
            .map(|e| e.occupied)
            .unwrap_or(0)
    }

    /// Sets the occupied count for one connector type, bounded by the
    /// number of ports of that type on `station`
    pub fn set_occupied(
        &mut self,
        station: &Station,
        connector: ConnectorType,
        occupied: u32,
    ) -> DomainResult<()> {
        if !station.has_connector(connector) {
            return Err(DomainError::BadRequest(format!(
                "Station has no {} ports",
                connector
            )));
        }
        let capacity = station.capacity(connector);
        if occupied > capacity {
            return Err(DomainError::BadRequest(format!(
                "Occupied count for {} cannot exceed {}",
                connector, capacity
            )));
        }

        // Heal a record that drifted from the port list before writing
        self.reconcile(station);
        if let Some(entry) = self
            .port_status
            .iter_mut()
            .find(|e| e.connector_type == connector)
        {
            entry.occupied = occupied;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
