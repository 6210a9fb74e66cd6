//! Inputs accepted by the station service and repository

use super::model::{ConnectorType, GeoPoint, Port, StationState};

#[derive(Debug, Clone)]
pub struct NewStation {
    pub name: String,
    pub location: GeoPoint,
    pub address: String,
    pub ports: Vec<Port>,
    pub operating_hours: Option<String>,
    pub status: Option<StationState>,
}

/// Partial station update; `None` leaves the field untouched.
/// The owning operator is never changed through an update.
#[derive(Debug, Clone, Default)]
pub struct StationChanges {
    pub name: Option<String>,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub ports: Option<Vec<Port>>,
    pub operating_hours: Option<String>,
    pub status: Option<StationState>,
}

/// Listing filter. All set fields must match.
#[derive(Debug, Clone, Default)]
pub struct StationFilter {
    pub operator_id: Option<String>,
    pub status: Option<StationState>,
    pub connector_type: Option<ConnectorType>,
}
