#![allow(dead_code)]

use diesel::connection::SimpleConnection;
use diesel::{Connection, PgConnection};
use once_cell::sync::Lazy;
use trek_domain::{NewUser, User, UserRepository};
use trek_persistence::config::DbConfig;
use trek_persistence::pg::{build_pool, PgMediaRepository, PgPool, PgUserRepository, PoolProvider};
use url::Url;
use uuid::Uuid;

pub static TEST_POOL: Lazy<Option<PgPool>> = Lazy::new(|| {
    if std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let cfg = DbConfig::from_env().ok()?;
    let url = cfg.connection_url().ok()?;
    match build_pool(&url, 1, 2) {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("No se pudo construir pool de test: {e}");
            None
        }
    }
});

pub fn with_pool<F, R>(f: F) -> Option<R>
    where F: FnOnce(&PgPool) -> R
{
    TEST_POOL.as_ref().map(f)
}

pub struct Repos {
    pub users: PgUserRepository<PoolProvider>,
    pub media: PgMediaRepository<PoolProvider>,
}

/// Repositorios sobre el pool compartido, o `None` si no hay DATABASE_URL.
pub fn repos() -> Option<Repos> {
    with_pool(|pool| {
        let provider = PoolProvider { pool: pool.clone() };
        Repos { users: PgUserRepository::new(provider.clone()),
                media: PgMediaRepository::new(provider) }
    })
}

/// Username único por ejecución (cabe en VARCHAR(50)).
pub fn unique_username(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..12])
}

pub fn create_user(users: &PgUserRepository<PoolProvider>, prefix: &str) -> User {
    let new_user = NewUser::new(&unique_username(prefix), "$argon2id$test").expect("valid user");
    users.create(&new_user).expect("insert user")
}

/// Base de datos desechable en el mismo servidor que DATABASE_URL; se borra
/// al salir de scope. Para pruebas que alteran el esquema.
pub struct ScratchDb {
    admin_url: String,
    pub name: String,
    pub url: String,
}

impl ScratchDb {
    pub fn create(prefix: &str) -> Option<Self> {
        let cfg = DbConfig::from_env().ok()?;
        let admin_url = cfg.connection_url().ok()?;
        let name = format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..12]);
        let mut admin = PgConnection::establish(&admin_url).ok()?;
        if let Err(e) = admin.batch_execute(&format!("CREATE DATABASE {name};")) {
            eprintln!("No se pudo crear base desechable: {e}");
            return None;
        }
        let mut parsed = Url::parse(&admin_url).ok()?;
        parsed.set_path(&format!("/{name}"));
        Some(Self { admin_url, name, url: parsed.to_string() })
    }

    pub fn connect(&self) -> PgConnection {
        PgConnection::establish(&self.url).expect("connect scratch db")
    }
}

impl Drop for ScratchDb {
    fn drop(&mut self) {
        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            let _ = admin.batch_execute(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE);", self.name));
        }
    }
}
