//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::station::{ConnectorType, VehicleType};
use crate::domain::user::{is_valid_phone, UpdateProfile, MAX_VEHICLE_PROFILES};
use crate::domain::{DomainError, DomainResult, User, UserRole, VehicleProfile};
use crate::interfaces::http::common::trim::trimmed_string;

/// Public view of a user. Credentials are never serialised.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub vehicle_profiles: Vec<VehicleProfileResponse>,
    pub favorite_stations: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            company: user.company,
            phone: user.phone,
            vehicle_profiles: user
                .vehicle_profiles
                .into_iter()
                .map(VehicleProfileResponse::from)
                .collect(),
            favorite_stations: user.favorite_stations,
            is_active: user.is_active,
            last_login: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Stored vehicle profile plus the range left at its current charge
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfileResponse {
    #[serde(flatten)]
    pub profile: VehicleProfile,
    pub estimated_range_km: f64,
}

impl From<VehicleProfile> for VehicleProfileResponse {
    fn from(profile: VehicleProfile) -> Self {
        Self {
            estimated_range_km: profile.estimated_range_km(),
            profile,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserData {
    pub user: UserResponse,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenData {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfileRequest {
    #[validate(required(message = "Vehicle type is required"))]
    pub vehicle_type: Option<VehicleType>,
    #[serde(rename = "batteryCapacity_kWh")]
    #[validate(
        required(message = "Battery capacity is required"),
        range(min = 0.5, max = 200.0, message = "Battery capacity must be between 0.5 and 200 kWh")
    )]
    pub battery_capacity_kwh: Option<f64>,
    #[serde(rename = "efficiency_kWh_per_km")]
    #[validate(
        required(message = "Efficiency is required"),
        range(min = 0.01, max = 1.0, message = "Efficiency must be between 0.01 and 1 kWh/km")
    )]
    pub efficiency_kwh_per_km: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Battery percent must be between 0 and 100"))]
    pub battery_percent: Option<f64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one compatible connector is required"))]
    pub compatible_connectors: Vec<ConnectorType>,
}

impl VehicleProfileRequest {
    fn into_profile(self) -> DomainResult<VehicleProfile> {
        let missing = || DomainError::validation("Vehicle profile is incomplete");
        Ok(VehicleProfile {
            vehicle_type: self.vehicle_type.ok_or_else(missing)?,
            battery_capacity_kwh: self.battery_capacity_kwh.ok_or_else(missing)?,
            efficiency_kwh_per_km: self.efficiency_kwh_per_km.ok_or_else(missing)?,
            battery_percent: self.battery_percent.unwrap_or(100.0),
            compatible_connectors: self.compatible_connectors,
        })
    }
}

/// Fields a user may change on their own profile.
/// Email and password are not accepted here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_string")]
    pub phone: Option<String>,
    /// Only applied for operators
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(length(max = 200, message = "Company name cannot exceed 200 characters"))]
    pub company: Option<String>,
    #[validate(
        length(max = 5, message = "You can have at most 5 vehicle profiles"),
        nested
    )]
    pub vehicle_profiles: Option<Vec<VehicleProfileRequest>>,
}

impl UpdateMeRequest {
    pub fn into_update(self) -> DomainResult<UpdateProfile> {
        if let Some(ref phone) = self.phone {
            check_phone(phone)?;
        }
        let vehicle_profiles = match self.vehicle_profiles {
            Some(profiles) => {
                if profiles.len() > MAX_VEHICLE_PROFILES {
                    return Err(DomainError::validation(format!(
                        "You can have at most {} vehicle profiles",
                        MAX_VEHICLE_PROFILES
                    )));
                }
                Some(
                    profiles
                        .into_iter()
                        .map(VehicleProfileRequest::into_profile)
                        .collect::<DomainResult<Vec<_>>>()?,
                )
            }
            None => None,
        };

        Ok(UpdateProfile {
            name: self.name,
            phone: self.phone,
            company: self.company,
            vehicle_profiles,
        })
    }
}

pub const MSG_PASSWORD_FIELDS: &str =
    "Current password, new password and confirm password field are required";

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub new_password_confirm: Option<String>,
}

impl ChangePasswordRequest {
    /// `(current, new)` once every field is present and the confirmation matches
    pub fn into_parts(self) -> DomainResult<(String, String)> {
        let (Some(current), Some(new), Some(confirm)) = (
            non_empty(self.current_password),
            non_empty(self.new_password),
            non_empty(self.new_password_confirm),
        ) else {
            return Err(DomainError::BadRequest(MSG_PASSWORD_FIELDS.into()));
        };

        if new.chars().count() < 8 {
            return Err(DomainError::BadRequest(
                "New password must be at least 8 characters".into(),
            ));
        }
        if new != confirm {
            return Err(DomainError::BadRequest("Passwords do not match".into()));
        }
        Ok((current, new))
    }
}

pub(crate) fn check_phone(phone: &str) -> DomainResult<()> {
    if is_valid_phone(phone.trim()) {
        Ok(())
    } else {
        Err(DomainError::validation("Please provide a valid phone number"))
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
