//! Errores del dominio y de los repositorios.
//!
//! `StoreError` es la taxonomía neutral (independiente del backend) de fallos
//! de almacenamiento: replica las violaciones de constraint que reporta el
//! motor relacional. `DomainError` agrega las reglas de la aplicación
//! (credenciales, títulos duplicados, validación de longitudes).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("not null violation: {0}")]
    NotNullViolation(String),
    #[error("not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("unknown storage error: {0}")]
    Unknown(String),
}

/// Error personalizado del dominio de MyMediaTrek
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    ValidationError(String),

    #[error("El usuario ya existe: {0}")]
    UsernameTaken(String),

    #[error("Usuario o contraseña incorrectos")]
    InvalidCredentials,

    #[error("«{0}» ya está en tu lista")]
    DuplicateTitle(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Error de hashing: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
