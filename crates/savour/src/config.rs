//! Application configuration.
//!
//! Settings come either from the process environment (with `.env` support)
//! or from a TOML file:
//!
//! ```toml
//! environment = "development"
//!
//! [database]
//! url = "${DATABASE_URL}"
//! max_connections = 8
//! ```

use savour_sql::{SqlError, SqlResult};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MAX_CONNECTIONS: usize = 16;

/// Which database the application talks to by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Test,
}

impl Environment {
    pub fn default_database_url(&self) -> &'static str {
        match self {
            Environment::Development => "postgresql:///savour",
            Environment::Test => "postgresql:///savour_test",
        }
    }

    fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("test") {
            Environment::Test
        } else {
            Environment::Development
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    pub database: DatabaseConfig,
}

impl Config {
    /// Build from `SAVOUR_ENV`, `DATABASE_URL` and `SAVOUR_MAX_CONNECTIONS`,
    /// loading `.env` first when present.
    pub fn from_env() -> SqlResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SqlResult<Self> {
        let environment = lookup("SAVOUR_ENV")
            .map(|name| Environment::from_name(&name))
            .unwrap_or_default();
        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| environment.default_database_url().to_string());
        let max_connections = match lookup("SAVOUR_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SqlError::config(format!("SAVOUR_MAX_CONNECTIONS must be a number, got '{raw}'"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let config = Self {
            environment,
            database: DatabaseConfig {
                url,
                max_connections,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, expanding `${VAR}` in `database.url`.
    pub fn load(path: impl AsRef<Path>) -> SqlResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SqlError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::parse(&raw, |key| std::env::var(key).ok()).map_err(|e| match e {
            SqlError::Config(msg) => SqlError::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    fn parse(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> SqlResult<Self> {
        let mut config: Config =
            toml::from_str(raw).map_err(|e| SqlError::config(format!("invalid config: {e}")))?;
        config.database.url = expand_env_vars(&config.database.url, lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SqlResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(SqlError::config("database.url must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(SqlError::config("database.max_connections must be at least 1"));
        }
        Ok(())
    }

    /// Connection pool sized from this config.
    pub fn create_pool(&self) -> SqlResult<deadpool_postgres::Pool> {
        savour_sql::create_pool_with_config(&self.database.url, self.database.max_connections)
    }
}

fn expand_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> SqlResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(SqlError::config(format!(
                    "unterminated env var reference: ${{{key}"
                )));
            }
            if key.is_empty() {
                return Err(SqlError::config("invalid env var reference: ${}"));
            }

            let value = lookup(&key).ok_or_else(|| {
                SqlError::config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&value);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn env_defaults_follow_environment() {
        let dev = Config::from_lookup(vars(&[])).unwrap();
        assert_eq!(dev.environment, Environment::Development);
        assert_eq!(dev.database.url, "postgresql:///savour");
        assert_eq!(dev.database.max_connections, 16);

        let test = Config::from_lookup(vars(&[("SAVOUR_ENV", "TEST")])).unwrap();
        assert_eq!(test.database.url, "postgresql:///savour_test");
    }

    #[test]
    fn env_overrides() {
        let config = Config::from_lookup(vars(&[
            ("DATABASE_URL", "postgresql://localhost/other"),
            ("SAVOUR_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();
        assert_eq!(config.database.url, "postgresql://localhost/other");
        assert_eq!(config.database.max_connections, 4);

        assert!(Config::from_lookup(vars(&[("SAVOUR_MAX_CONNECTIONS", "lots")])).is_err());
        assert!(Config::from_lookup(vars(&[("SAVOUR_MAX_CONNECTIONS", "0")])).is_err());
    }

    #[test]
    fn toml_with_expansion() {
        let raw = r#"
            environment = "test"

            [database]
            url = "postgresql://${PGHOST}/savour_test"
        "#;
        let config = Config::parse(raw, vars(&[("PGHOST", "db")])).unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.database.url, "postgresql://db/savour_test");
        assert_eq!(config.database.max_connections, 16);
    }

    #[test]
    fn toml_errors() {
        let missing = "[database]\nurl = \"${NOPE}\"\n";
        assert!(matches!(Config::parse(missing, vars(&[])), Err(SqlError::Config(_))));

        let unterminated = "[database]\nurl = \"${NOPE\"\n";
        assert!(Config::parse(unterminated, vars(&[])).is_err());

        let empty = "[database]\nurl = \"  \"\n";
        assert!(Config::parse(empty, vars(&[])).is_err());

        assert!(Config::parse("not toml", vars(&[])).is_err());
    }
}
