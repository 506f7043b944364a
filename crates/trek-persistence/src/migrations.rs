//! Wrapper para correr las migraciones embebidas (el DDL de `users` y
//! `media_items` vive en `migrations/` de este crate).

use crate::error::PersistenceError;
use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<(), PersistenceError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| PersistenceError::Unknown(format!("migration error: {e}")))?;
    for version in &applied {
        info!("migration applied: {version}");
    }
    Ok(())
}

/// Revierte la última migración aplicada (borra tablas: destructivo).
pub fn revert_last_migration(conn: &mut PgConnection) -> Result<String, PersistenceError> {
    conn.revert_last_migration(MIGRATIONS)
        .map(|version| version.to_string())
        .map_err(|e| PersistenceError::Unknown(format!("migration revert error: {e}")))
}

pub fn pending_migration_count(conn: &mut PgConnection) -> Result<usize, PersistenceError> {
    conn.pending_migrations(MIGRATIONS)
        .map(|pending| pending.len())
        .map_err(|e| PersistenceError::Unknown(format!("migration status error: {e}")))
}
