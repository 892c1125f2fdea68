//! # Users
//!
//! Marketplace accounts and the register/login request shapes.

use crate::error::{MarketError, MarketResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Vendor,
    Supplier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Supplier => "supplier",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor" => Ok(Role::Vendor),
            "supplier" => Ok(Role::Supplier),
            "admin" => Ok(Role::Admin),
            other => Err(MarketError::InvalidRequest(format!("Unknown role: {}", other))),
        }
    }
}

/// A registered user. The password is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Plaintext password compare
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}

/// Fields needed to create a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> MarketResult<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Register request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub user: NewUser,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Check field formats and that both passwords agree
    pub fn validate(&self) -> MarketResult<()> {
        let user = &self.user;
        for (field, value) in [
            ("username", &user.username),
            ("firstName", &user.first_name),
            ("lastName", &user.last_name),
        ] {
            if value.trim().is_empty() {
                return Err(MarketError::InvalidRequest(format!("{} is required", field)));
            }
        }
        validate_email(&user.email)?;
        validate_password(&user.password)?;
        if user.password != self.confirm_password {
            return Err(MarketError::InvalidRequest("Passwords don't match".to_string()));
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> MarketResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MarketError::InvalidRequest("Invalid email format".to_string()))
    }
}

fn validate_password(password: &str) -> MarketResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MarketError::InvalidRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
