//! SurrealDB connection handling
//!
//! Resolves where the compliance tables live and opens a migrated connection.
//! Resolution order for [`connect_from_env`]:
//! 1. Remote/cloud endpoint with credentials (`SURREALDB_ENDPOINT` + auth vars)
//! 2. Plain URL (`SURREALDB_URL`), no authentication
//! 3. Local persistence under `.healthy-city/db`

use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{info, instrument};

use crate::error::StateError;
use crate::migrations;
use crate::Result;

/// Default namespace for compliance data
pub const DEFAULT_NAMESPACE: &str = "healthy_city";
/// Default database for compliance data
pub const DEFAULT_DATABASE: &str = "standards";
/// Local persistence directory used when no remote config is present
pub const DEFAULT_LOCAL_PATH: &str = ".healthy-city/db";

/// Configuration for an authenticated SurrealDB connection
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Endpoint URL (e.g., "wss://xxx.aws-use1.surrealdb.cloud")
    pub endpoint: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Namespace (default: "healthy_city")
    pub namespace: String,
    /// Database name (default: "standards")
    pub database: String,
    /// Whether this is a root user (true) or database user (false)
    pub is_root: bool,
}

impl StoreConfig {
    /// Create a new configuration for a database user
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            is_root: false,
        }
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    /// Set whether this is a root user
    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT (required)
    /// - SURREALDB_USERNAME (required)
    /// - SURREALDB_PASSWORD (required)
    /// - SURREALDB_NAMESPACE (optional, default: "healthy_city")
    /// - SURREALDB_DATABASE (optional, default: "standards")
    /// - SURREALDB_ROOT (optional, default: "false")
    pub fn from_env() -> std::result::Result<Self, String> {
        let endpoint =
            std::env::var("SURREALDB_ENDPOINT").map_err(|_| "SURREALDB_ENDPOINT not set")?;
        let username =
            std::env::var("SURREALDB_USERNAME").map_err(|_| "SURREALDB_USERNAME not set")?;
        let password =
            std::env::var("SURREALDB_PASSWORD").map_err(|_| "SURREALDB_PASSWORD not set")?;
        let namespace = std::env::var("SURREALDB_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let database =
            std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let is_root = std::env::var("SURREALDB_ROOT")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            endpoint,
            username,
            password,
            namespace,
            database,
            is_root,
        })
    }
}

/// Open a connection to `url` without authentication, select the default
/// namespace/database, and run migrations.
pub async fn connect_url(url: &str) -> Result<Surreal<Any>> {
    let db = surrealdb::engine::any::connect(url)
        .await
        .map_err(|e| StateError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

    db.use_ns(DEFAULT_NAMESPACE)
        .use_db(DEFAULT_DATABASE)
        .await
        .map_err(|e| StateError::Connection(e.to_string()))?;

    migrations::init_schema(&db).await?;
    Ok(db)
}

/// Open an authenticated connection described by `config` and run migrations.
#[instrument(skip(config), fields(endpoint = %config.endpoint, namespace = %config.namespace, database = %config.database))]
pub async fn connect_with_config(config: &StoreConfig) -> Result<Surreal<Any>> {
    info!("Connecting to SurrealDB (root={})", config.is_root);

    let db = surrealdb::engine::any::connect(&config.endpoint)
        .await
        .map_err(|e| {
            StateError::Connection(format!("Failed to connect to {}: {}", config.endpoint, e))
        })?;

    if config.is_root {
        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| StateError::Connection(format!("Root authentication failed: {e}")))?;
    } else {
        db.signin(Database {
            namespace: &config.namespace,
            database: &config.database,
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| StateError::Connection(format!("Database authentication failed: {e}")))?;
    }

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| StateError::Connection(e.to_string()))?;

    migrations::init_schema(&db).await?;
    Ok(db)
}

/// Connect using the environment, falling back to local persistence.
pub async fn connect_from_env() -> Result<Surreal<Any>> {
    if let Ok(config) = StoreConfig::from_env() {
        return connect_with_config(&config).await;
    }

    if let Ok(url) = std::env::var("SURREALDB_URL") {
        info!("SURREALDB_URL found, connecting to {}", url);
        return connect_url(&url).await;
    }

    std::fs::create_dir_all(DEFAULT_LOCAL_PATH).map_err(|e| {
        StateError::Connection(format!(
            "Failed to create database directory {}: {}",
            DEFAULT_LOCAL_PATH, e
        ))
    })?;
    let url = format!("surrealkv://{}", DEFAULT_LOCAL_PATH);
    info!(
        "No remote config or SURREALDB_URL found, using local persistence: {}",
        url
    );
    connect_url(&url).await
}
