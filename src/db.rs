use crate::config::Config;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;
use std::time::Duration;

const MEMORY_DB: &str = ":memory:";

pub struct Database {
    // Keeps the underlying database (and replica sync task) alive for `conn`.
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let turso_url = cfg.app.turso_url.clone();
        let turso_auth_token = cfg.app.turso_auth_token.clone();

        if cfg.app.get_db() == MEMORY_DB {
            tracing::info!("[db] running with an in-memory database");
            return Self::open_in_memory().await;
        }

        let path = data_dir.join(cfg.app.get_db());
        let db = match (turso_url, turso_auth_token) {
            (Some(url), Some(token)) => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                Builder::new_synced_database(&path, url, token)
                    .sync_interval(sync_interval)
                    .build()
                    .await?
            }
            _ => {
                tracing::info!(path = ?path, "[db] running with a local database");
                Builder::new_local(&path).build().await?
            }
        };

        Self::from_libsql(db).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(MEMORY_DB).build().await?;
        Self::from_libsql(db).await
    }

    async fn from_libsql(db: LibsqlDatabase) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (name, sql) in crate::bookmarks::schema() {
            tracing::debug!("ensuring schema: {}", name);
            conn.execute_batch(sql)
                .await
                .map_err(|e| anyhow::anyhow!("failed to apply schema {name}: {e}"))?;
        }

        Ok(Database { _db: db, conn })
    }
}
