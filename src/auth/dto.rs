use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::TokenPair;
use crate::auth::repo_types::{User, UserProfile};
use crate::error::AppError;

const DEFAULT_LAST_NAME: &str = "lastName";
const DEFAULT_LOCATION: &str = "my city";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `PATCH /auth/updateUser`; every field is mandatory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
}

/// Response returned after register, login, refresh or profile update.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            last_name: u.last_name,
            email: u.email,
            location: u.location,
        }
    }
}

fn bounded(field: &str, value: String, min: usize, max: usize) -> Result<String, AppError> {
    let value = value.trim().to_string();
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::bad_request(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(value)
}

fn email(value: String) -> Result<String, AppError> {
    let value = value.trim().to_lowercase();
    if !is_valid_email(&value) {
        return Err(AppError::bad_request("Please provide a valid email"));
    }
    Ok(value)
}

impl RegisterRequest {
    pub fn profile(&self) -> Result<UserProfile, AppError> {
        Ok(UserProfile {
            name: bounded("name", self.name.clone(), 3, 50)?,
            last_name: bounded(
                "lastName",
                self.last_name.clone().unwrap_or_else(|| DEFAULT_LAST_NAME.into()),
                1,
                20,
            )?,
            location: bounded(
                "location",
                self.location.clone().unwrap_or_else(|| DEFAULT_LOCATION.into()),
                1,
                20,
            )?,
            email: email(self.email.clone())?,
        })
    }
}

impl UpdateUserRequest {
    pub fn profile(self) -> Result<UserProfile, AppError> {
        let required = |field: &str, v: Option<String>| -> Result<String, AppError> {
            v.filter(|s| !s.trim().is_empty())
                .ok_or_else(|| AppError::bad_request(format!("{field}__required")))
        };
        let name = required("name", self.name)?;
        let last_name = required("lastName", self.last_name)?;
        let location = required("location", self.location)?;
        let mail = required("email", self.email)?;
        Ok(UserProfile {
            name: bounded("name", name, 3, 50)?,
            last_name: bounded("lastName", last_name, 1, 20)?,
            location: bounded("location", location, 1, 20)?,
            email: email(mail)?,
        })
    }
}
