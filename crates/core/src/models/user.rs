use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;
use crate::errors::{ParishError, ParishResult};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 8;

text_enum! {
    pub enum Role {
        Parishioner => "parishioner",
        Admin => "admin",
        Superadmin => "superadmin",
    }
}

impl Role {
    /// Admin screens are open to admins and superadmins.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::Superadmin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> ParishResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Superadmin request to create a new administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl CreateAdminRequest {
    pub fn validate(&self) -> ParishResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

impl UpdateAdminRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if self.role == Some(Role::Superadmin) {
            return Err(ParishError::Validation(
                "Superadmin role cannot be granted through this endpoint".to_string(),
            ));
        }
        Ok(())
    }
}

/// A user's edit of their own profile. Email and role are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> ParishResult<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

pub fn validate_name(name: &str) -> ParishResult<()> {
    if name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(ParishError::Validation("Your name is too short".to_string()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ParishResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ParishError::Validation(format!("Invalid email address: {email}")))
    }
}

pub fn validate_password(password: &str) -> ParishResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ParishError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
