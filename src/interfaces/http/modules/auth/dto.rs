//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::super::users::dto::{check_phone, non_empty, UserResponse};
use crate::interfaces::http::common::trim::trimmed_string;
use crate::application::{AuthResult, SignupInput};
use crate::domain::{DomainError, DomainResult, UserRole};

pub const MSG_SIGNIN_FIELDS: &str = "Please provide email and password";

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        required(message = "Please provide your name"),
        length(min = 3, max = 100, message = "Name must be between 3 and 100 characters")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        required(message = "Please provide your email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Please provide a password"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub password: Option<String>,
    #[validate(required(message = "Please confirm your password"))]
    pub password_confirm: Option<String>,
    /// `user` (default) or `operator`
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(length(max = 200, message = "Company name cannot exceed 200 characters"))]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "trimmed_string")]
    pub phone: Option<String>,
}

impl SignupRequest {
    pub fn into_input(self) -> DomainResult<SignupInput> {
        let missing = || DomainError::validation("Missing required fields");
        let password = self.password.ok_or_else(missing)?;
        if self.password_confirm.as_deref() != Some(password.as_str()) {
            return Err(DomainError::validation("Passwords are not the same!"));
        }
        if let Some(ref phone) = self.phone {
            check_phone(phone)?;
        }

        Ok(SignupInput {
            name: self.name.ok_or_else(missing)?,
            email: self.email.ok_or_else(missing)?,
            password,
            role: self.role,
            company: self.company,
            phone: self.phone,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SigninRequest {
    pub fn into_credentials(self) -> DomainResult<(String, String)> {
        match (non_empty(self.email), non_empty(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(DomainError::BadRequest(MSG_SIGNIN_FIELDS.into())),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<AuthResult> for AuthData {
    fn from(auth: AuthResult) -> Self {
        Self {
            token: auth.token,
            token_type: auth.token_type,
            expires_in: auth.expires_in,
            user: auth.user.into(),
        }
    }
}
