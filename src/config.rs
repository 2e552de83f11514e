use crate::error::{
    BadEnvVarSnafu, ParseNumberSnafu, StudentError, StudentResult, UnknownStoreKindSnafu,
};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::{str::FromStr, sync::Arc, time::Duration};

const DEFAULT_SERVER_IP: &str = "127.0.0.1:3000";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_config: Arc<ServerConfig>,
    db_config: Option<Arc<DbConfig>>,
}

impl RuntimeConfiguration {
    pub fn new() -> StudentResult<Self> {
        Self::from_lookup(dotenvy::var)
    }

    /// `lookup` is `dotenvy::var` outside of tests.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> StudentResult<Self> {
        let server_config = ServerConfig::from_lookup(&lookup)?;
        let db_config = match server_config.store_kind {
            StoreKind::Postgres => Some(Arc::new(DbConfig::from_lookup(&lookup)?)),
            StoreKind::Memory => None,
        };

        Ok(Self {
            server_config: Arc::new(server_config),
            db_config,
        })
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }

    pub fn db_config(&self) -> Option<Arc<DbConfig>> {
        self.db_config.clone()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = StudentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => UnknownStoreKindSnafu { found: s }.fail(),
        }
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub server_ip: String,
    pub frontend_origin: String,
    pub store_kind: StoreKind,
}

impl ServerConfig {
    fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> StudentResult<Self> {
        let store_kind = match lookup("STORE_KIND") {
            Ok(kind) => kind.parse()?,
            Err(_) => StoreKind::Postgres,
        };

        Ok(Self {
            server_ip: lookup("SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string()),
            frontend_origin: lookup("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string()),
            store_kind,
        })
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl DbConfig {
    pub(crate) fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> StudentResult<Self> {
        let get_env_var = |name| lookup(name).context(BadEnvVarSnafu { name });

        let acquire_timeout_secs = match lookup("DB_ACQUIRE_TIMEOUT_SECS") {
            Ok(secs) => secs.parse().context(ParseNumberSnafu {
                name: "DB_ACQUIRE_TIMEOUT_SECS",
            })?,
            Err(_) => DEFAULT_ACQUIRE_TIMEOUT_SECS,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Ok(max) => max.parse().context(ParseNumberSnafu {
                name: "DB_MAX_CONNECTIONS",
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            user: get_env_var("DB_USER")?,
            //local setups commonly run without a password
            password: SecretString::from(lookup("DB_PASSWORD").unwrap_or_default()),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?
                .parse()
                .context(ParseNumberSnafu { name: "DB_PORT" })?,
            database: get_env_var("DB_NAME")?,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }

    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// How long startup and each query wait for a connection before giving up.
    pub const fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
