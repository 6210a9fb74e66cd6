//! Charging station domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Physical plug standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ConnectorType {
    #[serde(rename = "AC_SLOW")]
    AcSlow,
    Type2,
    #[serde(rename = "CCS")]
    Ccs,
    #[serde(rename = "CHAdeMO")]
    Chademo,
}

impl ConnectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcSlow => "AC_SLOW",
            Self::Type2 => "Type2",
            Self::Ccs => "CCS",
            Self::Chademo => "CHAdeMO",
        }
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AC_SLOW" => Ok(Self::AcSlow),
            "Type2" => Ok(Self::Type2),
            "CCS" => Ok(Self::Ccs),
            "CHAdeMO" => Ok(Self::Chademo),
            other => Err(format!("Invalid connector type: {}", other)),
        }
    }
}

/// Kind of vehicle a port or a vehicle profile is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Bike,
    Car,
}

/// Whether a station is listed as operating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StationState {
    #[default]
    Active,
    Inactive,
}

impl StationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::str::FromStr for StationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("Invalid station status: {}", other)),
        }
    }
}

/// WGS84 point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, String> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude must be between -180 and 180".to_string());
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude must be between -90 and 90".to_string());
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// GeoJSON order: `[longitude, latitude]`
    pub fn from_coordinates(coordinates: &[f64]) -> Result<Self, String> {
        match coordinates {
            [lng, lat] => Self::new(*lng, *lat),
            _ => Err("Coordinates must be [longitude, latitude]".to_string()),
        }
    }

    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

pub const MIN_POWER_KW: f64 = 0.5;
pub const MAX_POWER_KW: f64 = 350.0;

/// A group of identical charging points on a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub connector_type: ConnectorType,
    pub vehicle_type: VehicleType,
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
    /// Number of physical points of this kind
    pub total: u32,
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
}

impl Port {
    /// Messages for every broken invariant, empty when valid
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(MIN_POWER_KW..=MAX_POWER_KW).contains(&self.power_kw) {
            errors.push(format!(
                "Power must be between {} and {} kW",
                MIN_POWER_KW, MAX_POWER_KW
            ));
        }
        if self.total < 1 {
            errors.push("Port total must be at least 1".to_string());
        }
        if self.price_per_kwh < 0.0 || !self.price_per_kwh.is_finite() {
            errors.push("Price cannot be negative".to_string());
        }
        errors
    }
}

/// Checks a full port list the way it will be stored
pub fn validate_ports(ports: &[Port]) -> Result<(), Vec<String>> {
    if ports.is_empty() {
        return Err(vec!["Station must have at least one port".to_string()]);
    }
    let errors: Vec<String> = ports.iter().flat_map(Port::violations).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub const DEFAULT_OPERATING_HOURS: &str = "24/7";

/// Charging station
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub name: String,
    /// User id of the operator that owns the station
    pub operator_id: String,
    pub location: GeoPoint,
    pub address: String,
    pub ports: Vec<Port>,
    pub operating_hours: String,
    pub status: StationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.operator_id == user_id
    }

    /// Distinct connector types in order of first appearance
    pub fn connector_types(&self) -> Vec<ConnectorType> {
        let mut types: Vec<ConnectorType> = Vec::new();
        for port in &self.ports {
            if !types.contains(&port.connector_type) {
                types.push(port.connector_type);
            }
        }
        types
    }

    /// Total charging points offering `connector`
    pub fn capacity(&self, connector: ConnectorType) -> u32 {
        self.ports
            .iter()
            .filter(|p| p.connector_type == connector)
            .map(|p| p.total)
            .sum()
    }

    pub fn has_connector(&self, connector: ConnectorType) -> bool {
        self.ports.iter().any(|p| p.connector_type == connector)
    }
}
