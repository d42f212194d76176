use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Default page size for the list endpoint; 0 = unlimited.
    pub list_limit: usize,
    /// Length of each top-N ranking in the statistics payload.
    pub stats_top_n: usize,
    /// Optional JSON array of flat records loaded into the store at startup.
    pub seed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            rust_log: "info".to_string(),
            list_limit: 100,
            stats_top_n: 10,
            seed_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            list_limit: parse_env("RESUME_LIST_LIMIT", defaults.list_limit)?,
            stats_top_n: parse_env("STATS_TOP_N", defaults.stats_top_n)?,
            seed_path: std::env::var("RESUME_SEED_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.list_limit, 100);
        assert_eq!(config.stats_top_n, 10);
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_parse_env_falls_back_and_validates() {
        assert_eq!(
            parse_env::<usize>("RESUMEDESK_TEST_UNSET_VARIABLE", 7).unwrap(),
            7
        );
        std::env::set_var("RESUMEDESK_TEST_BAD_NUMBER", "ten");
        assert!(parse_env::<usize>("RESUMEDESK_TEST_BAD_NUMBER", 7).is_err());
        std::env::set_var("RESUMEDESK_TEST_GOOD_NUMBER", " 25 ");
        assert_eq!(
            parse_env::<usize>("RESUMEDESK_TEST_GOOD_NUMBER", 7).unwrap(),
            25
        );
    }
}
