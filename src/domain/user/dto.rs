//! Inputs accepted by the user repository

use super::model::{UserRole, VehicleProfile};

/// A user about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// Partial profile update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub vehicle_profiles: Option<Vec<VehicleProfile>>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.vehicle_profiles.is_none()
    }
}
