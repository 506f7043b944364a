//! Carga de configuración de conexión desde variables de entorno.
//! Usa convención `DATABASE_URL` (con `POSTGRES_URL` como alternativa) y
//! parámetros opcionales de pool.

use std::env;
use once_cell::sync::Lazy;
use dotenvy::dotenv;
use url::Url;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de una fuente arbitraria (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PersistenceError>
        where F: Fn(&str) -> Option<String>
    {
        let url = lookup("DATABASE_URL").or_else(|| lookup("POSTGRES_URL"))
                                        .filter(|u| !u.trim().is_empty())
                                        .ok_or_else(|| PersistenceError::Config("DATABASE_URL no definido".into()))?;
        let min_connections = lookup("DATABASE_MIN_CONNECTIONS").and_then(|v| v.parse().ok()).unwrap_or(2);
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()).unwrap_or(16);
        Ok(Self { url, min_connections, max_connections })
    }

    /// URL efectiva: si no trae `sslmode`, se exige TLS salvo en localhost.
    pub fn connection_url(&self) -> Result<String, PersistenceError> {
        let mut parsed = Url::parse(&self.url).map_err(|e| PersistenceError::Config(format!("DATABASE_URL inválido: {e}")))?;
        if parsed.query_pairs().any(|(k, _)| k == "sslmode") {
            return Ok(self.url.clone());
        }
        let local = matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1") | Some("[::1]") | Some("::1"));
        let mode = if local { "prefer" } else { "require" };
        parsed.query_pairs_mut().append_pair("sslmode", mode);
        Ok(parsed.to_string())
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_postgres_url() {
        let cfg = DbConfig::from_lookup(lookup(&[("POSTGRES_URL", "postgres://u:p@db/trek")])).unwrap();
        assert_eq!(cfg.url, "postgres://u:p@db/trek");
        assert_eq!((cfg.min_connections, cfg.max_connections), (2, 16));
    }

    #[test]
    fn missing_url_is_a_config_error() {
        assert!(matches!(DbConfig::from_lookup(lookup(&[])), Err(PersistenceError::Config(_))));
    }

    #[test]
    fn sslmode_depends_on_host() {
        let remote = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:p@db.example.com:5432/trek")])).unwrap();
        assert!(remote.connection_url().unwrap().ends_with("sslmode=require"));
        let local = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:p@localhost/trek")])).unwrap();
        assert!(local.connection_url().unwrap().ends_with("sslmode=prefer"));
    }

    #[test]
    fn explicit_sslmode_is_kept() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:p@db/trek?sslmode=disable"),
                                                 ("DATABASE_MAX_CONNECTIONS", "4")])).unwrap();
        assert_eq!(cfg.connection_url().unwrap(), "postgres://u:p@db/trek?sslmode=disable");
        assert_eq!(cfg.max_connections, 4);
    }
}
