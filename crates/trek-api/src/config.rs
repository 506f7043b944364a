use chrono::{Duration as ChronoDuration, Utc};
use tracing::warn;

pub const DEFAULT_JWT_SECRET: &str = "default-secret-key-please-change";
pub const DEFAULT_ADMIN_KEY: &str = "default-admin-key-please-change";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 signing secret. Override with JWT_SECRET_KEY.
    pub jwt_secret: String,
    /// Shared key expected in `X-Admin-Key` to create accounts. Override with ADMIN_MASTER_KEY.
    pub admin_master_key: String,
    /// Access token TTL (default 1 day). Override with ACCESS_TTL_SECS.
    pub access_ttl: ChronoDuration,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let jwt_secret = lookup("JWT_SECRET_KEY").unwrap_or_else(|| {
            warn!("JWT_SECRET_KEY not set; using the insecure default");
            DEFAULT_JWT_SECRET.into()
        });
        let admin_master_key = lookup("ADMIN_MASTER_KEY").unwrap_or_else(|| {
            warn!("ADMIN_MASTER_KEY not set; using the insecure default");
            DEFAULT_ADMIN_KEY.into()
        });
        let access_ttl = lookup("ACCESS_TTL_SECS").and_then(|raw| {
                                                      let ttl = parse_ttl(&raw);
                                                      if ttl.is_none() {
                                                          warn!("ACCESS_TTL_SECS={raw} out of range; using the default");
                                                      }
                                                      ttl
                                                  })
                                                  .unwrap_or_else(default_ttl);
        Self { jwt_secret, admin_master_key, access_ttl }
    }
}

fn default_ttl() -> ChronoDuration {
    ChronoDuration::days(1)
}

/// `None` si no es entero o si `ahora + ttl` no es representable.
fn parse_ttl(raw: &str) -> Option<ChronoDuration> {
    let secs: i64 = raw.trim().parse().ok()?;
    let ttl = ChronoDuration::try_seconds(secs)?;
    Utc::now().checked_add_signed(ttl).map(|_| ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = AuthConfig::from_lookup(|_| None);
        assert_eq!(cfg.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(cfg.admin_master_key, DEFAULT_ADMIN_KEY);
        assert_eq!(cfg.access_ttl.num_seconds(), 86_400);
    }

    #[test]
    fn overrides_and_bad_ttl() {
        let cfg = AuthConfig::from_lookup(|key| match key {
            "JWT_SECRET_KEY" => Some("s".into()),
            "ACCESS_TTL_SECS" => Some("soon".into()),
            _ => None,
        });
        assert_eq!(cfg.jwt_secret, "s");
        assert_eq!(cfg.access_ttl.num_seconds(), 86_400);
    }

    #[test]
    fn huge_ttl_falls_back_to_default() {
        for raw in ["10000000000000000", "9000000000000", "-9000000000000"] {
            let cfg = AuthConfig::from_lookup(|key| (key == "ACCESS_TTL_SECS").then(|| raw.to_string()));
            assert_eq!(cfg.access_ttl.num_seconds(), 86_400, "ACCESS_TTL_SECS={raw}");
        }
    }

    #[test]
    fn negative_ttl_is_kept() {
        let cfg = AuthConfig::from_lookup(|key| (key == "ACCESS_TTL_SECS").then(|| "-60".to_string()));
        assert_eq!(cfg.access_ttl.num_seconds(), -60);
    }
}
