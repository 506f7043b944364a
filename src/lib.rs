//! MyMediaTrek
//!
//! Crate raíz del servicio: arma la configuración y el estado compartido a
//! partir de los crates del workspace.
//! - `config`: lectura de entorno (.env) para base de datos, auth y servidor.
//! - `errors`: errores de arranque.
//!
//! El binario `mymediatrek` (src/main.rs) levanta el servidor HTTP.

pub mod config;
pub mod errors;

use std::sync::Arc;

use trek_api::AppState;
use trek_persistence::{PgMediaRepository, PgUserRepository, PoolProvider};

pub use config::{AppConfig, ServerConfig};
pub use errors::CoreError;

/// Corre trabajo de arranque bloqueante fuera del runtime; un pánico en la
/// tarea se reporta como `CoreError::Internal`.
pub async fn run_blocking<T, F>(f: F) -> Result<T, CoreError>
    where F: FnOnce() -> Result<T, CoreError> + Send + 'static,
          T: Send + 'static
{
    tokio::task::spawn_blocking(f).await
                                  .map_err(|e| CoreError::Internal(format!("startup task failed: {e}")))?
}

/// Construye el pool (aplicando migraciones) y el estado de la API.
pub fn build_state(cfg: &AppConfig) -> Result<AppState, CoreError> {
    let url = cfg.database.connection_url()?;
    let pool = trek_persistence::build_pool(&url, cfg.database.min_connections, cfg.database.max_connections)?;
    let provider = PoolProvider { pool };
    Ok(AppState::new(Arc::new(PgUserRepository::new(provider.clone())),
                     Arc::new(PgMediaRepository::new(provider)),
                     cfg.auth.clone()))
}
