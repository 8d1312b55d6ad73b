use super::*;
use ::postgres::NoTls;
use r2d2_postgres::PostgresConnectionManager;
use tracing::debug;

pub type PostgresPool = r2d2::Pool<PostgresConnectionManager<NoTls>>;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS ledger_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Ledger entries in a single postgres table, values serialized as JSON
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PostgresPool,
}

impl PostgresStore {
    pub fn connect(url: &str, pool_size: u32) -> Result<Self> {
        let config: ::postgres::Config = url.parse()?;
        let manager = PostgresConnectionManager::new(config, NoTls);
        let pool = r2d2::Pool::builder().max_size(pool_size).build(manager)?;
        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(self)
    }

    fn init_schema(&self) -> Result<()> {
        self.pool.get()?.batch_execute(CREATE_TABLE)?;
        Ok(())
    }
}

impl Store for PostgresStore {
    fn get(&self, key: &Key) -> Result<Option<Value>> {
        let storage_key = key.to_storage_key();
        debug!(key = %storage_key, "loading entry");

        self.pool
            .get()?
            .query_opt(
                "SELECT value FROM ledger_entries WHERE key = $1",
                &[&storage_key],
            )?
            .map::<Result<_>, _>(|row| {
                let value: &str = row.try_get("value")?;
                Ok(serde_json::from_str::<Value>(value)?)
            })
            .transpose()
    }

    fn set(&self, key: Key, value: Value) -> Result<()> {
        let storage_key = key.to_storage_key();
        debug!(key = %storage_key, "storing entry");

        let value = serde_json::to_string(&value)?;
        self.pool.get()?.execute(
            "INSERT INTO ledger_entries (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            &[&storage_key, &value],
        )?;
        Ok(())
    }
}
