use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "USER_GATE_";

/// How `/login` checks a submitted password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMode {
    /// Look the user up by name, then verify the password against the stored hash.
    #[default]
    Verify,
    /// Match `username` and `password` columns against the raw input.
    /// Never succeeds for hashed rows; kept to reproduce the legacy behaviour.
    Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub loglevel: String,
    pub database_url: String,
    /// Drops the users table on startup. Destroys all stored users.
    pub reset_schema_on_start: bool,
    pub login_mode: LoginMode,
    pub seed_users: Vec<SeedUser>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            loglevel: "info".to_string(),
            database_url: "sqlite:user_gate.db".to_string(),
            reset_schema_on_start: false,
            login_mode: LoginMode::Verify,
            seed_users: Vec::new(),
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `USER_GATE_*`, then the bare `PORT`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&["PORT"]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_are_non_destructive() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg = Config::load()?;
            assert_eq!(cfg.port, 3000);
            assert!(!cfg.reset_schema_on_start);
            assert_eq!(cfg.login_mode, LoginMode::Verify);
            assert!(cfg.seed_users.is_empty());
            Ok(())
        });
    }

    #[test]
    fn port_env_overrides_file_and_prefixed_vars() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "port = 4000")?;
            jail.set_env("USER_GATE_PORT", "5000");
            jail.set_env("PORT", "8081");
            let cfg = Config::load()?;
            assert_eq!(cfg.port, 8081);
            Ok(())
        });
    }

    #[test]
    fn toml_file_supplies_seed_users_and_mode() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                login_mode = "literal"
                reset_schema_on_start = true

                [[seed_users]]
                username = "alice"
                password = "secret"
                "#,
            )?;
            let cfg = Config::load()?;
            assert_eq!(cfg.login_mode, LoginMode::Literal);
            assert!(cfg.reset_schema_on_start);
            assert_eq!(
                cfg.seed_users,
                vec![SeedUser {
                    username: "alice".to_string(),
                    password: "secret".to_string(),
                }]
            );
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_sets_database_url() {
        Jail::expect_with(|jail| {
            jail.set_env("USER_GATE_DATABASE_URL", "sqlite:/tmp/other.db");
            jail.set_env("USER_GATE_RESET_SCHEMA_ON_START", "true");
            let cfg = Config::load()?;
            assert_eq!(cfg.database_url, "sqlite:/tmp/other.db");
            assert!(cfg.reset_schema_on_start);
            Ok(())
        });
    }

    #[test]
    fn invalid_port_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "not-a-port");
            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
