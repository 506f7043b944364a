//! Implementaciones Postgres (Diesel) de los repositorios del dominio.
//!
//! Objetivo general del módulo:
//! - Delegar en Postgres toda la integridad: unicidad de username, FK con
//!   `ON DELETE CASCADE`, CHECK de rating, NOT NULL y los DEFAULT de
//!   timestamps. Aquí no se replica ninguna de esas reglas; sólo se traducen
//!   sus violaciones a `PersistenceError` / `StoreError`.
//! - Acotar cada consulta de `media_items` al `user_id` del dueño.
//! - Manejo básico de errores transitorios: reintento con backoff.

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::warn;

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

mod media;
mod users;

pub use media::PgMediaRepository;
pub use users::PgUserRepository;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
///
/// Notas operativas:
/// - El pool se construye con `min_idle` (mínimo de conexiones inactivas) y
///   `max_size` (límite superior total).
/// - Al construirlo, se corre automáticamente el set de migraciones pendientes
///   (una sola vez).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Contrato:
/// - Debe devolver una conexión válida o `PersistenceError::TransientIo` en
///   caso de error.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel.
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
/// Clonarla comparte el mismo pool.
#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}
impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
///
/// Cubre:
/// - Conflictos de serialización.
/// - Errores de IO transitorios de pool/conexión.
/// - Mensajes comunes de desconexión/timeout detectados por texto
///   (best-effort).
///
/// Las violaciones de constraint nunca se reintentan.
pub(crate) fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal (hasta 3 reintentos: 15ms, 30ms, 45ms).
/// Se emite `warn!` por intento. `f` debe ser una unidad de trabajo
/// idempotente o atómica.
pub(crate) fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts: u64 = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * (attempts + 1);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Para sentencias no idempotentes (INSERT): sólo se reintenta obtener la
/// conexión; la sentencia se ejecuta una única vez aunque falle con un error
/// transitorio, porque pudo haberse confirmado antes del corte.
pub(crate) fn with_checkout_retry<C, T, G, R>(checkout: G, run: R) -> Result<T, PersistenceError>
    where G: FnMut() -> Result<C, PersistenceError>,
          R: FnOnce(&mut C) -> Result<T, PersistenceError>
{
    let mut conn = with_retry(checkout)?;
    run(&mut conn)
}

/// Construye un pool Postgres r2d2 a partir de URL, sin tocar el esquema.
///
/// Comportamiento:
/// - Tamaños en 0 se elevan a 1; si `min_size > max_size`, usa
///   `min_size = max_size`.
/// - Devuelve `PersistenceError::TransientIo` ante errores del pool/manager.
pub fn connect_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max",
              validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder().min_idle(Some(final_min))
                         .max_size(validated_max)
                         .build(manager)
                         .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))
}

/// Igual que `connect_pool`, y además ejecuta las migraciones pendientes
/// tras el primer `get()`.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let pool = connect_pool(database_url, min_size, max_size)?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración (DATABASE_URL,
/// tamaños) y construye un pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.connection_url()?, cfg.min_connections, cfg.max_connections)
}
