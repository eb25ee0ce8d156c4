use crate::config::{Config, LoginMode, SeedUser};
use crate::db::models::{User, UserProfile, UserSummary};
use crate::db::schema::{SQLITE_INIT, SQLITE_RESET};
use crate::error::AppError;
use crate::password::{hash_password_blocking, verify_password_blocking};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info, warn};

pub type SqlitePool = Pool<Sqlite>;

/// Owner of the users table. Cheap to clone; clones share one pool.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (and create if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    /// Startup sequence: connect, run the schema step, then seed.
    /// Any failure aborts; a partly seeded store is never served.
    pub async fn bootstrap(cfg: &Config) -> Result<Self, AppError> {
        let store = Self::connect(&cfg.database_url).await?;
        store.init_schema(cfg.reset_schema_on_start).await?;
        info!("database connected");
        store.seed(&cfg.seed_users).await?;
        Ok(store)
    }

    /// Create each seed user through `create_user`. Existing rows are not
    /// checked, so seeding twice without a reset yields duplicates.
    pub async fn seed(&self, users: &[SeedUser]) -> Result<Vec<User>, AppError> {
        let mut created = Vec::with_capacity(users.len());
        for seed in users {
            created.push(self.create_user(&seed.username, &seed.password).await?);
        }
        if !created.is_empty() {
            info!(count = created.len(), "seeded users");
        }
        Ok(created)
    }

    /// Close every pooled connection. Later queries fail as store-unavailable.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create the users table if needed. With `reset`, every existing user is
    /// dropped first.
    pub async fn init_schema(&self, reset: bool) -> Result<(), AppError> {
        if reset {
            warn!("reset_schema_on_start is enabled; dropping users table");
            Self::execute_script(&self.pool, SQLITE_RESET).await?;
        }
        Self::execute_script(&self.pool, SQLITE_INIT).await
    }

    // sqlx::query runs a single statement; split the script ourselves.
    async fn execute_script(pool: &SqlitePool, script: &str) -> Result<(), AppError> {
        for stmt in script.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(pool).await?;
        }
        Ok(())
    }

    /// The only write path: hash, then insert. Returns the stored row.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        let hash = hash_password_blocking(password.to_owned()).await?;
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (username, password, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               RETURNING id, username, password, created_at, updated_at"#,
        )
        .bind(username)
        .bind(hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        info!(id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Row whose columns equal the raw inputs. An absent field binds NULL and
    /// therefore never matches.
    pub async fn find_by_username_and_password(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, password, created_at, updated_at
               FROM users WHERE username = ? AND password = ?
               ORDER BY id LIMIT 1"#,
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Earliest row with this username, hash included.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, password, created_at, updated_at
               FROM users WHERE username = ?
               ORDER BY id LIMIT 1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Look up by username, then check `password` against the stored hash.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };
        let matched = verify_password_blocking(password.to_owned(), user.password.clone()).await?;
        Ok(matched.then_some(user))
    }

    /// Credential check for `/login`, dispatched on `mode`.
    pub async fn authenticate(
        &self,
        mode: LoginMode,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        match mode {
            LoginMode::Literal => self.find_by_username_and_password(username, password).await,
            LoginMode::Verify => match (username, password) {
                (Some(u), Some(p)) => self.verify_credentials(u, p).await,
                _ => {
                    debug!("login request missing username or password");
                    Ok(None)
                }
            },
        }
    }

    /// All users as `{id, username}`, in insertion order.
    pub async fn list_all_basic(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>("SELECT id, username FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// `None` username behaves as a NULL lookup and never matches.
    pub async fn find_by_username_excluding_password(
        &self,
        username: Option<&str>,
    ) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"SELECT id, username, created_at, updated_at
               FROM users WHERE username = ?
               ORDER BY id LIMIT 1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }
}
