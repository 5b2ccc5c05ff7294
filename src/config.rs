use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use crate::db::SqlitePool;
use crate::error::CafeError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub max_connections: u32,
    /// Reset and populate the sample rows on start-up.
    pub seed_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:pug_cafe.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            max_connections: 5,
            seed_on_start: false,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `CAFE_*` environment variables.
    /// A value that fails to parse is an error, never a silent default.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("CAFE_"))
    }

    /// Open a pool against `database_url`, creating the file when missing.
    pub async fn connect(&self) -> Result<SqlitePool, CafeError> {
        let connect_opts = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(connect_opts)
            .await?;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_overrides() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load()?;
            assert_eq!(cfg.listen_addr, "0.0.0.0:8000");
            assert_eq!(cfg.max_connections, 5);
            assert!(!cfg.seed_on_start);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                database_url = "sqlite:from_toml.sqlite"
                loglevel = "debug"
                "#,
            )?;
            jail.set_env("CAFE_LOGLEVEL", "trace");
            jail.set_env("CAFE_SEED_ON_START", "true");

            let cfg = Config::load()?;
            assert_eq!(cfg.database_url, "sqlite:from_toml.sqlite");
            assert_eq!(cfg.loglevel, "trace");
            assert!(cfg.seed_on_start);
            Ok(())
        });
    }

    #[test]
    fn malformed_value_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("CAFE_MAX_CONNECTIONS", "plenty");
            jail.set_env("CAFE_DATABASE_URL", "sqlite:elsewhere.sqlite");

            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
