use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use super::{from_json, to_json};
use crate::domain::user::{NewUser, UpdateProfile, UserRepository};
use crate::domain::{DomainError, DomainResult, User, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: &str) -> DomainResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::User => UserRole::User,
        user::UserRole::Operator => UserRole::Operator,
        user::UserRole::Admin => UserRole::Admin,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::User => user::UserRole::User,
        UserRole::Operator => user::UserRole::Operator,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn user_model_to_domain(model: user::Model) -> DomainResult<User> {
    Ok(User {
        vehicle_profiles: from_json(&model.vehicle_profiles)?,
        favorite_stations: from_json(&model.favorite_stations)?,
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        company: model.company,
        phone: model.phone,
        is_active: model.is_active,
        last_login_at: model.last_login_at,
        password_changed_at: model.password_changed_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let email = dto.email.clone();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(dto.name),
            email: Set(dto.email),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            company: Set(dto.company),
            phone: Set(dto.phone),
            vehicle_profiles: Set("[]".to_string()),
            favorite_stations: Set("[]".to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            password_changed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict(email)
            } else {
                e.into()
            }
        })?;

        user_model_to_domain(model)
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.find_model(id)
            .await?
            .map(user_model_to_domain)
            .transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(user_model_to_domain)
            .transpose()
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn update_profile(&self, id: &str, dto: UpdateProfile) -> DomainResult<Option<User>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(name) = dto.name {
            active.name = Set(name);
        }
        if let Some(phone) = dto.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(company) = dto.company {
            active.company = Set(Some(company));
        }
        if let Some(profiles) = dto.vehicle_profiles {
            active.vehicle_profiles = Set(to_json(&profiles)?);
        }

        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        user_model_to_domain(updated).map(Some)
    }

    async fn update_password(
        &self,
        id: &str,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let Some(existing) = self.find_model(id).await? else {
            return Err(DomainError::not_found("user", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(password_hash.to_string());
        active.password_changed_at = Set(Some(changed_at));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        Ok(())
    }

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let Some(existing) = self.find_model(id).await? else {
            return Err(DomainError::not_found("user", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.last_login_at = Set(Some(at));
        active.update(&self.db).await?;

        Ok(())
    }

    async fn set_favorite_stations(
        &self,
        id: &str,
        station_ids: Vec<String>,
    ) -> DomainResult<Option<User>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.favorite_stations = Set(to_json(&station_ids)?);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        user_model_to_domain(updated).map(Some)
    }
}
