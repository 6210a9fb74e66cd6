//! Station DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::StationDetails;
use crate::domain::station::{
    ConnectorType, GeoPoint, NewStation, Port, PortStatus, Station, StationChanges, StationState,
    StationStatus, VehicleType,
};
use crate::domain::{DomainError, DomainResult};
use crate::interfaces::http::common::PageInfo;
use crate::shared::PaginatedResult;

// ── Requests ────────────────────────────────────────────────────

/// GeoJSON point
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LocationRequest {
    /// Must be `Point` when given
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default)]
    #[validate(length(equal = 2, message = "Coordinates must be [longitude, latitude]"))]
    pub coordinates: Vec<f64>,
}

impl LocationRequest {
    pub fn into_point(self) -> DomainResult<GeoPoint> {
        if let Some(kind) = self.kind {
            if kind != "Point" {
                return Err(DomainError::validation("Location type must be Point"));
            }
        }
        GeoPoint::from_coordinates(&self.coordinates).map_err(DomainError::validation)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortRequest {
    #[validate(required(message = "Port connector type is required"))]
    pub connector_type: Option<ConnectorType>,
    #[validate(required(message = "Port vehicle type is required"))]
    pub vehicle_type: Option<VehicleType>,
    #[serde(rename = "powerKW")]
    #[validate(
        required(message = "Port power is required"),
        range(min = 0.5, max = 350.0, message = "Power must be between 0.5 and 350 kW")
    )]
    pub power_kw: Option<f64>,
    #[validate(
        required(message = "Port total is required"),
        range(min = 1, message = "Port total must be at least 1")
    )]
    pub total: Option<u32>,
    #[serde(rename = "pricePerKWh")]
    #[validate(
        required(message = "Port price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price_per_kwh: Option<f64>,
}

impl PortRequest {
    pub fn into_port(self) -> DomainResult<Port> {
        let missing = || DomainError::validation("Port is incomplete");
        Ok(Port {
            connector_type: self.connector_type.ok_or_else(missing)?,
            vehicle_type: self.vehicle_type.ok_or_else(missing)?,
            power_kw: self.power_kw.ok_or_else(missing)?,
            total: self.total.ok_or_else(missing)?,
            price_per_kwh: self.price_per_kwh.ok_or_else(missing)?,
        })
    }
}

fn into_ports(ports: Vec<PortRequest>) -> DomainResult<Vec<Port>> {
    ports.into_iter().map(PortRequest::into_port).collect()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    #[validate(
        required(message = "A station must have a name"),
        length(min = 1, max = 100, message = "Station name must be between 1 and 100 characters")
    )]
    pub name: Option<String>,
    #[validate(required(message = "Station location is required"), nested)]
    pub location: Option<LocationRequest>,
    #[validate(
        required(message = "Station address is required"),
        length(min = 1, message = "Station address is required")
    )]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Station must have at least one port"), nested)]
    pub ports: Vec<PortRequest>,
    pub operating_hours: Option<String>,
    pub status: Option<StationState>,
}

impl CreateStationRequest {
    pub fn into_new_station(self) -> DomainResult<NewStation> {
        let missing = || DomainError::validation("name, location and ports fields are required");
        Ok(NewStation {
            name: self.name.ok_or_else(missing)?,
            location: self.location.ok_or_else(missing)?.into_point()?,
            address: self.address.ok_or_else(missing)?,
            ports: into_ports(self.ports)?,
            operating_hours: self.operating_hours,
            status: self.status,
        })
    }
}

/// Partial update. Unknown fields such as `operatorId` are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationRequest {
    #[validate(length(min = 1, max = 100, message = "Station name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(nested)]
    pub location: Option<LocationRequest>,
    #[validate(length(min = 1, message = "Station address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "Station must have at least one port"), nested)]
    pub ports: Option<Vec<PortRequest>>,
    pub operating_hours: Option<String>,
    pub status: Option<StationState>,
}

impl UpdateStationRequest {
    pub fn into_changes(self) -> DomainResult<StationChanges> {
        Ok(StationChanges {
            name: self.name,
            location: self.location.map(LocationRequest::into_point).transpose()?,
            address: self.address,
            ports: self.ports.map(into_ports).transpose()?,
            operating_hours: self.operating_hours,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOccupancyRequest {
    #[validate(required(message = "connectorType is required"))]
    pub connector_type: Option<ConnectorType>,
    #[validate(required(message = "occupied is required"))]
    pub occupied: Option<u32>,
}

impl UpdateOccupancyRequest {
    pub fn into_parts(self) -> DomainResult<(ConnectorType, u32)> {
        match (self.connector_type, self.occupied) {
            (Some(connector), Some(occupied)) => Ok((connector, occupied)),
            _ => Err(DomainError::validation("connectorType and occupied are required")),
        }
    }
}

/// List query: pagination plus optional filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StationListQuery {
    /// Page number (1-based). Default: 1
    pub page: Option<u64>,
    /// Items per page (1–100). Default: 20
    pub limit: Option<u64>,
    /// `active` or `inactive`
    #[param(value_type = Option<String>)]
    pub status: Option<StationState>,
    /// `AC_SLOW`, `Type2`, `CCS` or `CHAdeMO`
    #[param(value_type = Option<String>)]
    pub connector_type: Option<ConnectorType>,
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for LocationResponse {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: point.coordinates().to_vec(),
        }
    }
}

/// Occupancy of one connector type with the matching capacity
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortAvailability {
    pub connector_type: ConnectorType,
    pub occupied: u32,
    pub total: u32,
    pub available: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub id: String,
    pub name: String,
    pub operator_id: String,
    pub location: LocationResponse,
    pub address: String,
    pub ports: Vec<Port>,
    pub operating_hours: String,
    pub status: StationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_status: Option<Vec<PortAvailability>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
            operator_id: station.operator_id,
            location: station.location.into(),
            address: station.address,
            ports: station.ports,
            operating_hours: station.operating_hours,
            status: station.status,
            port_status: None,
            created_at: station.created_at,
            updated_at: station.updated_at,
        }
    }
}

impl From<StationDetails> for StationResponse {
    fn from(details: StationDetails) -> Self {
        let port_status = details.status.map(|status| {
            status
                .port_status
                .iter()
                .map(|entry| {
                    let total = details.station.capacity(entry.connector_type);
                    PortAvailability {
                        connector_type: entry.connector_type,
                        occupied: entry.occupied,
                        total,
                        available: total.saturating_sub(entry.occupied),
                    }
                })
                .collect()
        });

        Self {
            port_status,
            ..Self::from(details.station)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationData {
    pub station: StationResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationListData {
    pub stations: Vec<StationResponse>,
    pub pagination: PageInfo,
}

impl From<PaginatedResult<Station>> for StationListData {
    fn from(result: PaginatedResult<Station>) -> Self {
        let pagination = PageInfo::from(&result);
        Self {
            stations: result.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationStatusResponse {
    pub id: String,
    pub station_id: String,
    pub port_status: Vec<PortStatus>,
    pub updated_at: DateTime<Utc>,
}

impl From<StationStatus> for StationStatusResponse {
    fn from(status: StationStatus) -> Self {
        Self {
            id: status.id,
            station_id: status.station_id,
            port_status: status.port_status,
            updated_at: status.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationStatusData {
    pub station_status: StationStatusResponse,
}
