// user.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Límite de `users.username` (VARCHAR(50)).
pub const USERNAME_MAX_LEN: usize = 50;
/// Límite de `users.password_hash` (VARCHAR(255)).
pub const PASSWORD_HASH_MAX_LEN: usize = 255;

pub type UserId = i32;

/// Registro de identidad. Sólo `password_hash` cambia durante su vida útil.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Datos para insertar un usuario; `user_id` y `created_at` los asigna el motor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    password_hash: String,
}

impl NewUser {
    /// # Errores
    /// `DomainError::ValidationError` si el username está vacío o excede
    /// `USERNAME_MAX_LEN` caracteres, o si el hash excede
    /// `PASSWORD_HASH_MAX_LEN`.
    pub fn new(username: &str, password_hash: &str) -> Result<Self, DomainError> {
        validate_username(username)?;
        if password_hash.is_empty() {
            return Err(DomainError::ValidationError("password_hash vacío".to_string()));
        }
        validate_password_hash(password_hash)?;
        Ok(NewUser { username: username.to_string(),
                     password_hash: password_hash.to_string() })
    }

    pub fn username(&self) -> &str { &self.username }
    pub fn password_hash(&self) -> &str { &self.password_hash }
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::ValidationError("username no puede estar vacío".to_string()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::ValidationError(format!("username excede {USERNAME_MAX_LEN} caracteres")));
    }
    Ok(())
}

pub fn validate_password_hash(password_hash: &str) -> Result<(), DomainError> {
    if password_hash.chars().count() > PASSWORD_HASH_MAX_LEN {
        return Err(DomainError::ValidationError(format!("password_hash excede {PASSWORD_HASH_MAX_LEN} caracteres")));
    }
    Ok(())
}
