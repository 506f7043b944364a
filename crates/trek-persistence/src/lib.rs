//! trek-persistence
//!
//! Capa Postgres (Diesel) de MyMediaTrek: el esquema de `users` y
//! `media_items` como migraciones embebidas, el pool r2d2 y las
//! implementaciones de `UserRepository` / `MediaRepository`.
//!
//! Módulos:
//! - `pg`: pool, proveedor de conexiones, retry y repositorios.
//! - `migrations`: runner embebido de migraciones Diesel (el DDL).
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.
//! - `models`: filas Diesel y conversión a tipos de dominio.

pub mod config;
pub mod error;
pub mod migrations;
pub mod models;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, connect_pool, ConnectionProvider, PgMediaRepository, PgPool, PgUserRepository,
             PoolProvider};
