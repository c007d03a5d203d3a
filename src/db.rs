use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::HitRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Durable per-endpoint hit counts backed by a SQLite file.
///
/// The store owns its own synchronization: every increment runs under a
/// process-wide write lock, so it can be shared as `Arc<HitCounterStore>`
/// between request handlers without any ambient global state.
pub struct HitCounterStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl HitCounterStore {
    /// Opens (or creates) the store file and makes sure the schema exists.
    ///
    /// # Arguments
    /// * `config` - The database configuration
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - Store instance or `StoreError::Unavailable`
    pub async fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!("Opening hit counter store at {}", config.path.display());

        config.validate().map_err(|e| {
            error!("Invalid hit counter store configuration: {}", e);
            StoreError::Unavailable(e.to_string())
        })?;

        let pool = Self::create_pool(config).await?;
        let store = HitCounterStore {
            pool,
            write_lock: Mutex::new(()),
        };
        store.initialize().await?;

        Ok(store)
    }

    async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            // WAL lets snapshot readers proceed while a writer holds the lock
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout);

        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.busy_timeout)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Failed to open hit counter store: {}", e);
                StoreError::unavailable(e)
            })
    }

    /// Creates the `hits` table if it does not exist yet.
    /// Existing rows are left untouched, so this is safe to call at every startup.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let hits_table = r#"
            CREATE TABLE IF NOT EXISTS hits (
                endpoint TEXT PRIMARY KEY,
                hits INTEGER NOT NULL DEFAULT 0 CHECK (hits >= 0)
            )
        "#;

        sqlx::query(hits_table)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create hits table: {}", e);
                StoreError::unavailable(e)
            })?;

        info!("Hit counter schema ready");
        Ok(())
    }

    /// Adds one hit to `endpoint`, creating its record on first use.
    ///
    /// The upsert runs as a single statement under the write lock, so
    /// concurrent callers never lose an update. Storage failures are logged
    /// and reported as `false`; hit counting must never fail a request.
    pub async fn increment(&self, endpoint: &str) -> bool {
        if endpoint.is_empty() {
            warn!("Refusing to count a hit for an empty endpoint");
            return false;
        }

        match self.upsert_hit(endpoint).await {
            Ok(()) => {
                debug!(endpoint, "Recorded hit");
                true
            }
            Err(e) => {
                warn!(endpoint, error = %e, "Hit count was not recorded");
                false
            }
        }
    }

    async fn upsert_hit(&self, endpoint: &str) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO hits (endpoint, hits)
            VALUES (?, 1)
            ON CONFLICT(endpoint) DO UPDATE SET hits = hits + 1
        "#;

        let _guard = self.write_lock.lock().await;
        sqlx::query(query)
            .bind(endpoint)
            .execute(&self.pool)
            .await
            .map_err(StoreError::write)?;

        Ok(())
    }

    /// Every record in endpoint order.
    pub async fn records(&self) -> Result<Vec<HitRecord>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT endpoint, hits FROM hits ORDER BY endpoint")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::read)?;

        rows.into_iter()
            .map(|(endpoint, hits)| -> Result<HitRecord, StoreError> {
                let count = u64::try_from(hits)
                    .map_err(|_| StoreError::Read(format!("negative hit count {} for {}", hits, endpoint)))?;
                Ok(HitRecord { endpoint, count })
            })
            .collect()
    }

    /// Current count of every endpoint that has been hit at least once.
    /// A read failure degrades to an empty map instead of an error.
    pub async fn snapshot(&self) -> BTreeMap<String, u64> {
        match self.records().await {
            Ok(records) => records
                .into_iter()
                .map(|record| (record.endpoint, record.count))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Reporting empty hit counts");
                BTreeMap::new()
            }
        }
    }

    /// Closes the pool once the server has drained.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Hit counter store closed");
    }
}
