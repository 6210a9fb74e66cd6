//! User repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::dto::{NewUser, UpdateProfile};
use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is taken
    async fn create_user(&self, user: NewUser) -> DomainResult<User>;

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_profile(&self, id: &str, update: UpdateProfile) -> DomainResult<Option<User>>;
    async fn update_password(
        &self,
        id: &str,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> DomainResult<()>;
    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
    async fn set_favorite_stations(
        &self,
        id: &str,
        station_ids: Vec<String>,
    ) -> DomainResult<Option<User>>;
}
