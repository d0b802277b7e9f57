use std::net::SocketAddr;

use anyhow::Context;
use axum_extra::extract::cookie::Key;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub tmdb_api_key: String,
    pub tmdb_authorization: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub tmdb_rps: u32,
    pub secret_key: Option<String>,
}

/// `Key::derive_from` requires at least this much master key material.
const MIN_SECRET_KEY_LEN: usize = 32;

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process
    /// environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://top_movies.db?mode=rwc".to_string());

        let tmdb_api_key = var("TMDB_API_KEY").unwrap_or_default();
        let tmdb_authorization = var("TMDB_AUTHORIZATION").unwrap_or_default();
        let tmdb_base_url =
            var("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base_url = var("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let tmdb_rps: u32 = var("TMDB_RPS").and_then(|s| s.parse().ok()).unwrap_or(4);

        let secret_key = var("SECRET_KEY").filter(|s| !s.trim().is_empty());
        if let Some(secret) = &secret_key {
            anyhow::ensure!(
                secret.len() >= MIN_SECRET_KEY_LEN,
                "SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes"
            );
        }

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            tmdb_api_key,
            tmdb_authorization,
            tmdb_base_url,
            tmdb_image_base_url,
            tmdb_rps,
            secret_key,
        })
    }

    /// Signing key for form-protection cookies. Without `SECRET_KEY` a fresh key is
    /// generated, so outstanding forms stop validating after a restart.
    pub fn cookie_key(&self) -> Key {
        match &self.secret_key {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                tracing::warn!("SECRET_KEY not set, using a random cookie signing key");
                Key::generate()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database_url, "sqlite://top_movies.db?mode=rwc");
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.tmdb_rps, 4);
        assert!(config.tmdb_api_key.is_empty());
        assert!(config.tmdb_authorization.is_empty());
        assert_eq!(config.secret_key, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let secret = "s".repeat(MIN_SECRET_KEY_LEN);
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("TMDB_AUTHORIZATION", "Bearer abc"),
            ("TMDB_RPS", "10"),
            ("SECRET_KEY", secret.as_str()),
        ])
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.tmdb_authorization, "Bearer abc");
        assert_eq!(config.tmdb_rps, 10);
        assert_eq!(config.secret_key.as_deref(), Some(secret.as_str()));
    }

    #[test]
    fn short_secret_key_is_rejected() {
        let err = config_from(&[("SECRET_KEY", "too-short")]).unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn blank_secret_key_counts_as_unset() {
        assert_eq!(config_from(&[("SECRET_KEY", "   ")]).unwrap().secret_key, None);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = config_from(&[("PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "PORT");
    }

    #[test]
    fn unparsable_rps_falls_back_to_default() {
        assert_eq!(config_from(&[("TMDB_RPS", "fast")]).unwrap().tmdb_rps, 4);
    }

    #[test]
    fn cookie_key_is_stable_for_a_configured_secret() {
        let secret = "k".repeat(MIN_SECRET_KEY_LEN);
        let config = config_from(&[("SECRET_KEY", secret.as_str())]).unwrap();

        assert_eq!(config.cookie_key().master(), config.cookie_key().master());
        assert_ne!(Key::generate().master(), Key::generate().master());
    }
}
