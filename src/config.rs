use std::env;
use anyhow::{bail, Context, Result};
use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

/// Semua konfigurasi runtime, dibaca dari env (plus `.env` lewat dotenv).
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub feed_requires_auth: bool,
    pub storage: StorageKind,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a number")?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<i64>()
            .context("TOKEN_TTL_SECS must be a number")?;

        let feed_requires_auth = parse_bool(
            &env::var("FEED_REQUIRES_AUTH").unwrap_or_else(|_| "true".to_string()),
        )
        .context("FEED_REQUIRES_AUTH must be true or false")?;

        let storage = match env::var("STORAGE").unwrap_or_else(|_| "postgres".into()).as_str() {
            "postgres" => StorageKind::Postgres,
            "memory" => StorageKind::Memory,
            other => bail!("unknown STORAGE '{}', expected postgres or memory", other),
        };

        Ok(Self {
            port,
            allowed_origins,
            jwt_secret,
            token_ttl_secs,
            feed_requires_auth,
            storage,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("not a boolean: {}", other),
    }
}

/// Tampilkan 4 karakter awal dan akhir saja; secret pendek disembunyikan penuh.
/// Dipotong per char, bukan per byte.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "[REDACTED]".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

pub fn get_pg_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);
    if let Ok(port) = env::var("PG_PORT") {
        cfg.port = Some(port.parse().context("PG_PORT must be a number")?);
    }

    // PoolConfig.max_size bertipe usize
    let mut pool_cfg = cfg.pool.unwrap_or_default();
    pool_cfg.max_size = 16;
    cfg.pool = Some(pool_cfg);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
       .context("failed to create postgres pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_boolean_flags() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool(" no ").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn masks_secret_by_chars() {
        assert_eq!(mask_secret("short"), "[REDACTED]");
        assert_eq!(mask_secret("abcdefghijkl"), "abcd***ijkl");
        // multi-byte di posisi potong tidak boleh panic
        assert_eq!(mask_secret("ab€cdefghijkl"), "ab€c***ijkl");
        assert_eq!(mask_secret("€€€€€€€€€"), "€€€€***€€€€");
        assert_eq!(mask_secret("ééééééé€"), "[REDACTED]");
    }
}
