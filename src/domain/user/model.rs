//! User domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::station::{ConnectorType, VehicleType};

/// At most this many vehicle profiles per user
pub const MAX_VEHICLE_PROFILES: usize = 5;
/// At most this many favourite stations per user
pub const MAX_FAVORITE_STATIONS: usize = 20;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Operator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Operator => "operator",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "operator" => Ok(Self::Operator),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A vehicle owned by a user, used for range and compatibility hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    pub vehicle_type: VehicleType,
    #[serde(rename = "batteryCapacity_kWh")]
    pub battery_capacity_kwh: f64,
    #[serde(rename = "efficiency_kWh_per_km")]
    pub efficiency_kwh_per_km: f64,
    pub battery_percent: f64,
    pub compatible_connectors: Vec<ConnectorType>,
}

impl VehicleProfile {
    /// Estimated remaining range in kilometres
    pub fn estimated_range_km(&self) -> f64 {
        if self.efficiency_kwh_per_km <= 0.0 {
            return 0.0;
        }
        self.battery_capacity_kwh * (self.battery_percent / 100.0) / self.efficiency_kwh_per_km
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    /// Only meaningful for operators
    pub company: Option<String>,
    pub phone: Option<String>,
    pub vehicle_profiles: Vec<VehicleProfile>,
    pub favorite_stations: Vec<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_operator(&self) -> bool {
        self.role == UserRole::Operator
    }

    /// True when the password was changed after a token issued at
    /// `issued_at` (unix seconds). Compared at second precision, so a
    /// token minted in the same second as the change stays valid.
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| issued_at < changed.timestamp())
    }

    pub fn has_favorite(&self, station_id: &str) -> bool {
        self.favorite_stations.iter().any(|id| id == station_id)
    }
}

/// Display names are 3 to 100 characters once trimmed
pub fn is_valid_name(name: &str) -> bool {
    (3..=100).contains(&name.trim().chars().count())
}

/// `^[+]?[\d\s\-()]{10,20}$`
pub fn is_valid_phone(phone: &str) -> bool {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    let len = body.chars().count();
    (10..=20).contains(&len)
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')'))
}
