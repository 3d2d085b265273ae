use anyhow::Context;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> anyhow::Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections = match get("WELLNESS_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("WELLNESS_DB_MAX_CONNECTIONS is not a number: {raw}"))?
                .max(1),
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let log_filter = get("WELLNESS_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            database_url,
            max_connections,
            log_filter,
        })
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to a Postgres instance for this command")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::from_env_with(|_| None).unwrap();
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.require_database_url().is_err());
    }

    #[test]
    fn reads_values_and_prefers_wellness_log_level() {
        let get = |k: &str| match k {
            "DATABASE_URL" => Some("postgres://localhost/wellness".into()),
            "WELLNESS_DB_MAX_CONNECTIONS" => Some("12".into()),
            "WELLNESS_LOG_LEVEL" => Some("debug".into()),
            "RUST_LOG" => Some("warn".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).unwrap();
        assert_eq!(cfg.require_database_url().unwrap(), "postgres://localhost/wellness");
        assert_eq!(cfg.max_connections, 12);
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn rejects_non_numeric_pool_size() {
        let get = |k: &str| match k {
            "WELLNESS_DB_MAX_CONNECTIONS" => Some("lots".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn blank_database_url_counts_as_unset() {
        let get = |k: &str| match k {
            "DATABASE_URL" => Some("  ".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).unwrap();
        assert!(cfg.database_url.is_none());
    }
}
