//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::user::{
    is_valid_name, NewUser, UpdateProfile, MAX_FAVORITE_STATIONS, MAX_VEHICLE_PROFILES,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::parse_id;

pub const MSG_INCORRECT_CREDENTIALS: &str = "Incorrect email or password";
pub const MSG_USER_GONE: &str = "The user belonging to this token no longer exists.";
pub const MSG_DEACTIVATED: &str = "This account has been deactivated.";
pub const MSG_PASSWORD_CHANGED: &str = "User recently changed password! Please log in again.";
pub const MSG_NAME_LENGTH: &str = "Name must be between 3 and 100 characters";

/// Authentication result returned after signup, signin or a password change
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Self-registration input, already shape-validated by the caller
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// User service: orchestrates all identity / user-management use-cases.
///
/// Generic over the repository provider so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<P: RepositoryProvider + ?Sized> {
    repos: Arc<P>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl<P: RepositoryProvider + ?Sized> UserService<P> {
    pub fn new(repos: Arc<P>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user, &self.jwt_config)?;
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new `user` or `operator` account and sign it in.
    pub async fn signup(&self, input: SignupInput) -> DomainResult<AuthResult> {
        let role = input.role.unwrap_or_default();
        if role == UserRole::Admin {
            return Err(DomainError::Forbidden(
                "You cannot register as an admin".into(),
            ));
        }
        let name = input.name.trim().to_string();
        check_name(&name)?;

        let email = normalize_email(&input.email);
        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(email));
        }

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let user = self
            .repos
            .users()
            .create_user(NewUser {
                name,
                email,
                password_hash,
                role,
                company: trimmed(input.company).filter(|_| role == UserRole::Operator),
                phone: trimmed(input.phone),
            })
            .await?;

        metrics::counter!("users_registered_total", "role" => role.as_str()).increment(1);
        info!(user_id = %user.id, role = %role, "New user registered");

        self.issue(user)
    }

    /// Create the bootstrap admin when no user exists yet.
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> DomainResult<bool> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(false);
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let user = self
            .repos
            .users()
            .create_user(NewUser {
                name: name.to_string(),
                email: normalize_email(email),
                password_hash,
                role: UserRole::Admin,
                company: None,
                phone: None,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Default admin account created");
        Ok(true)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify email + password and return a fresh token.
    pub async fn signin(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().get_user_by_email(&email).await? else {
            return Err(DomainError::Unauthorized(MSG_INCORRECT_CREDENTIALS.into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized(MSG_INCORRECT_CREDENTIALS.into()));
        }

        if !user.is_active {
            return Err(DomainError::Unauthorized(MSG_DEACTIVATED.into()));
        }

        let now = Utc::now();
        self.repos.users().record_login(&user.id, now).await?;

        let user = User {
            last_login_at: Some(now),
            ..user
        };
        info!(user_id = %user.id, "User signed in");
        self.issue(user)
    }

    /// Resolve a bearer token to its (still valid) user
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = verify_token(token, &self.jwt_config)?;

        let Some(user) = self.repos.users().get_user_by_id(&claims.sub).await? else {
            return Err(DomainError::Unauthorized(MSG_USER_GONE.into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized(MSG_DEACTIVATED.into()));
        }

        if user.changed_password_after(claims.iat) {
            return Err(DomainError::Unauthorized(MSG_PASSWORD_CHANGED.into()));
        }

        Ok(user)
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn get_me(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    /// Update name, phone, vehicle profiles and, for operators, company.
    /// A company sent by anyone else is ignored.
    pub async fn update_me(&self, user: &User, mut update: UpdateProfile) -> DomainResult<User> {
        if !user.is_operator() {
            update.company = None;
        }
        update.name = trimmed(update.name);
        update.phone = trimmed(update.phone);
        update.company = trimmed(update.company);
        if let Some(ref name) = update.name {
            check_name(name)?;
        }

        if let Some(ref profiles) = update.vehicle_profiles {
            if profiles.len() > MAX_VEHICLE_PROFILES {
                return Err(DomainError::validation(format!(
                    "You can have at most {} vehicle profiles",
                    MAX_VEHICLE_PROFILES
                )));
            }
        }

        if update.is_empty() {
            return Ok(user.clone());
        }

        self.repos
            .users()
            .update_profile(&user.id, update)
            .await?
            .ok_or_else(|| DomainError::not_found("user", &user.id))
    }

    /// Change the password after checking the current one.
    /// Tokens issued before the change stop working; a new one is returned.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<AuthResult> {
        if new_password.chars().count() < 8 {
            return Err(DomainError::BadRequest(
                "New password must be at least 8 characters".into(),
            ));
        }

        let user = self.get_me(user_id).await?;

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(user_id, "Password change rejected: wrong current password");
            return Err(DomainError::Unauthorized(
                "Current password is incorrect".into(),
            ));
        }

        let new_hash = hash_password(new_password, self.bcrypt_cost)?;
        let changed_at = Utc::now();
        self.repos
            .users()
            .update_password(user_id, &new_hash, changed_at)
            .await?;

        info!(user_id, "Password changed");
        self.issue(User {
            password_hash: new_hash,
            password_changed_at: Some(changed_at),
            ..user
        })
    }

    // ── Favourites ──────────────────────────────────────────────

    pub async fn add_favorite(&self, user: &User, station_id: &str) -> DomainResult<User> {
        let station_id = parse_id("id", station_id)?;
        if !self.repos.stations().exists(station_id).await? {
            return Err(DomainError::not_found("station", station_id));
        }

        if user.has_favorite(station_id) {
            return Ok(user.clone());
        }
        if user.favorite_stations.len() >= MAX_FAVORITE_STATIONS {
            return Err(DomainError::BadRequest(format!(
                "You can have at most {} favorite stations",
                MAX_FAVORITE_STATIONS
            )));
        }

        let mut favorites = user.favorite_stations.clone();
        favorites.push(station_id.to_string());
        self.save_favorites(user, favorites).await
    }

    pub async fn remove_favorite(&self, user: &User, station_id: &str) -> DomainResult<User> {
        let station_id = parse_id("id", station_id)?;
        if !user.has_favorite(station_id) {
            return Ok(user.clone());
        }

        let favorites = user
            .favorite_stations
            .iter()
            .filter(|id| id.as_str() != station_id)
            .cloned()
            .collect();
        self.save_favorites(user, favorites).await
    }

    async fn save_favorites(&self, user: &User, favorites: Vec<String>) -> DomainResult<User> {
        self.repos
            .users()
            .set_favorite_stations(&user.id, favorites)
            .await?
            .ok_or_else(|| DomainError::not_found("user", &user.id))
    }
}

// ── Helpers ─────────────────────────────────────────────────────

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn check_name(name: &str) -> DomainResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(DomainError::validation(MSG_NAME_LENGTH))
    }
}
