use thiserror::Error;

/// Errors produced by services and repositories.
///
/// Every variant except `Infra` is operational: its message is safe to return
/// to the client as-is.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No {entity} found with {field} {value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A path or body identifier that is not a valid id
    #[error("Invalid {field}: {value}")]
    InvalidId { field: &'static str, value: String },

    #[error("'{0}' already exists")]
    Conflict(String),

    #[error("Invalid input data. {}", .0.join(". "))]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid token, please login again!")]
    InvalidToken,

    #[error("Token expired. Please relogin")]
    TokenExpired,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Expected, user-facing failure (as opposed to an infrastructure fault)
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Infra(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Infra(InfraError::Database(e))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        Self::Infra(InfraError::Serialization(e))
    }
}

impl From<bcrypt::BcryptError> for DomainError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Infra(InfraError::Crypto(e.to_string()))
    }
}
