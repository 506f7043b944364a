//! Configuración central del servicio.
//! Junta la sección de base de datos (`trek_persistence`), la de
//! autenticación (`trek_api`) y la del servidor HTTP.
use std::net::SocketAddr;

use trek_api::AuthConfig;
use trek_persistence::DbConfig;

use crate::errors::CoreError;

pub struct AppConfig {
    pub database: DbConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

/// Dirección de escucha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, CoreError> {
        format!("{}:{}", self.host, self.port).parse()
                                              .map_err(|e| CoreError::Config(format!("HOST/PORT inválidos: {e}")))
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        trek_persistence::init_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let database = DbConfig::from_lookup(&lookup)?;
        let auth = AuthConfig::from_lookup(&lookup);
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>()
                            .map_err(|_| CoreError::Config(format!("PORT inválido: {raw}")))?,
            None => 5000,
        };
        Ok(Self { database, auth, server: ServerConfig { host, port } })
    }
}
