//! trek-api
//!
//! Superficie HTTP (axum) de MyMediaTrek. Los handlers son delgados: extraen
//! identidad y cuerpo, delegan en los casos de uso de `trek_domain` dentro de
//! `spawn_blocking` y traducen `DomainError` a respuestas JSON.
//!
//! Módulos:
//! - `auth`: JWT HS256 y extractores `AuthUser` / `AdminKey`.
//! - `config`: secretos y TTL leídos del entorno.
//! - `error`: `ApiError` y sus dos formas de cuerpo.
//! - `serializers`: cuerpos de petición y respuesta.
//! - `urls`: tabla de rutas.
//! - `views`: handlers.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use trek_domain::{MediaRepository, UserRepository};

pub mod auth;
pub mod config;
pub mod error;
pub mod serializers;
pub mod urls;
pub mod views;

pub use config::AuthConfig;
pub use error::ApiError;
pub use urls::router;

pub struct AuthKeys {
    pub config: AuthConfig,
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(config: AuthConfig) -> Self {
        let encoding = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self { config, encoding, decoding }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub auth: Arc<AuthKeys>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, media: Arc<dyn MediaRepository>, auth: AuthConfig) -> Self {
        Self { users, media, auth: Arc::new(AuthKeys::new(auth)) }
    }
}
