use anyhow::anyhow;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub save_debounce_ms: u64,
    pub connection_timeout_seconds: u64,
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow!("Invalid {} '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            database_url: env_or("DATABASE_URL", defaults.database_url)?,
            save_debounce_ms: env_or("SAVE_DEBOUNCE_MS", defaults.save_debounce_ms)?,
            connection_timeout_seconds: env_or(
                "CONNECTION_TIMEOUT_SECONDS",
                defaults.connection_timeout_seconds,
            )?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite://scorekeeper.db?mode=rwc".to_string(),
            save_debounce_ms: 250,
            connection_timeout_seconds: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_to_default() {
        let port: u16 = env_or("SCOREKEEPER_TEST_UNSET_PORT", 9000).unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_env_or_rejects_unparsable_value() {
        // Key is unique to this test, so no other test observes it
        unsafe { env::set_var("SCOREKEEPER_TEST_BAD_DEBOUNCE", "soon") };
        let err = env_or::<u64>("SCOREKEEPER_TEST_BAD_DEBOUNCE", 250).unwrap_err();
        assert!(err.to_string().contains("SCOREKEEPER_TEST_BAD_DEBOUNCE"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.save_debounce_ms, 250);
        assert!(config.database_url.starts_with("sqlite://"));
    }
}
