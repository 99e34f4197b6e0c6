//! SQLite cache store implementation.
//!
//! Generic expiring key-value entries, structured route entries, and RPC
//! provider health, all in one embedded database file. Expiry is decided
//! against the injected [`Clock`], so a row past its ttl is never returned
//! even before maintenance sweeps it.

use std::sync::Arc;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sql_types::BigInt;
use diesel::upsert::excluded;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapter::outbound::sqlite::database::connection::{
    create_pool, run_migrations, ConnectionOptions, DbPool,
};
use crate::adapter::outbound::sqlite::database::model::{
    CacheRow, NewProviderHealthRow, ProviderHealthRow, RouteRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    cache, routes, rpc_provider_health_state,
};
use crate::domain::{
    expiry_from, ChainId, CleanupReport, ErrorCountPolicy, ProviderHealthRecord, RouteRecord,
};
use crate::error::StoreError;
use crate::port::Clock;

/// Default lifetime of a structured route entry.
pub const DEFAULT_ROUTE_TTL_SECS: i64 = 300;

/// Every table carrying an absolute `ttl` column.
const TTL_TABLES: [&str; 7] = [
    "cache",
    "routes",
    "cached_routes",
    "pool_cache",
    "cached_v3_pools",
    "cached_v2_pairs",
    "token_properties_cache",
];

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Settings for a [`CacheStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    /// Database file path or SQLite URL.
    pub path: String,
    pub connection: ConnectionOptions,
    pub error_count_policy: ErrorCountPolicy,
    /// Chance in `[0, 1]` that a cleanup pass also compacts the file.
    pub vacuum_probability: f64,
}

impl StoreOptions {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            connection: ConnectionOptions::default(),
            error_count_policy: ErrorCountPolicy::default(),
            vacuum_probability: 0.01,
        }
    }
}

/// SQLite-backed cache store with an explicit open/close lifecycle.
///
/// Every operation fails with [`StoreError::NotOpen`] outside that window.
pub struct CacheStore {
    options: StoreOptions,
    clock: Arc<dyn Clock>,
    pool: RwLock<Option<DbPool>>,
}

impl CacheStore {
    /// Create a closed store. Call [`CacheStore::open`] before use.
    #[must_use]
    pub fn new(options: StoreOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            options,
            clock,
            pool: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.pool.read().is_some()
    }

    /// Open the database file, apply pragmas, and run pending migrations.
    ///
    /// Opening an already open store is a no-op.
    pub fn open(&self) -> Result<(), StoreError> {
        let mut guard = self.pool.write();
        if guard.is_some() {
            return Ok(());
        }
        let pool = create_pool(&self.options.path, self.options.connection)?;
        run_migrations(&pool)?;
        info!(path = %self.options.path, "Cache store opened");
        *guard = Some(pool);
        Ok(())
    }

    /// Release the connection pool.
    pub fn close(&self) {
        if self.pool.write().take().is_some() {
            info!(path = %self.options.path, "Cache store closed");
        }
    }

    fn conn(&self) -> Result<Conn, StoreError> {
        let pool = self.pool.read().clone().ok_or(StoreError::NotOpen)?;
        Ok(pool.get()?)
    }

    /// Read a live entry.
    ///
    /// A stored payload that no longer deserializes as `T` is logged and
    /// reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut conn = self.conn()?;
        let now = self.clock.now();

        let row: Option<CacheRow> = cache::table
            .find(key)
            .filter(cache::ttl.eq(0).or(cache::ttl.gt(now)))
            .select(CacheRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.and_then(|row| match serde_json::from_str(&row.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Malformed cache payload, treating as miss");
                None
            }
        }))
    }

    /// Write an entry. A `ttl_secs` of zero or less never expires.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: i64,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(value)?;
        let mut conn = self.conn()?;
        let now = self.clock.now();

        let row = CacheRow {
            key: key.to_string(),
            value,
            ttl: expiry_from(now, ttl_secs),
            created_at: now,
        };
        diesel::replace_into(cache::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!(key, ttl = row.ttl, "Cache entry written");
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::delete(cache::table.find(key)).execute(&mut conn)?;
        Ok(())
    }

    pub async fn get_route(&self, route_id: &str) -> Result<Option<RouteRecord>, StoreError> {
        let mut conn = self.conn()?;
        let now = self.clock.now();

        let row: Option<RouteRow> = routes::table
            .find(route_id)
            .filter(routes::ttl.eq(0).or(routes::ttl.gt(now)))
            .select(RouteRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.and_then(Self::route_from_row))
    }

    /// Write a route entry; `created_at` and `ttl` are stamped here.
    ///
    /// Token addresses are stored lower-cased.
    pub async fn set_route(&self, entry: &RouteRecord, ttl_secs: i64) -> Result<(), StoreError> {
        let route = serde_json::to_string(&entry.route)?;
        let chain_id = chain_column(entry.chain_id)?;
        let mut conn = self.conn()?;
        let now = self.clock.now();

        let row = RouteRow {
            route_id: entry.route_id.clone(),
            chain_id,
            token_in_address: entry.token_in_address.to_lowercase(),
            token_out_address: entry.token_out_address.to_lowercase(),
            amount: entry.amount.clone(),
            trade_type: entry.trade_type.to_string(),
            route,
            created_at: now,
            ttl: expiry_from(now, ttl_secs),
        };
        diesel::replace_into(routes::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!(route_id = %entry.route_id, ttl = row.ttl, "Route entry written");
        Ok(())
    }

    /// Live route entries for a token pair, newest first.
    pub async fn routes_for_pair(
        &self,
        chain_id: ChainId,
        token_in: &str,
        token_out: &str,
    ) -> Result<Vec<RouteRecord>, StoreError> {
        let chain_id = chain_column(chain_id)?;
        let mut conn = self.conn()?;
        let now = self.clock.now();

        let rows: Vec<RouteRow> = routes::table
            .filter(routes::chain_id.eq(chain_id))
            .filter(routes::token_in_address.eq(token_in.to_lowercase()))
            .filter(routes::token_out_address.eq(token_out.to_lowercase()))
            .filter(routes::ttl.eq(0).or(routes::ttl.gt(now)))
            .order(routes::created_at.desc())
            .select(RouteRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().filter_map(Self::route_from_row).collect())
    }

    fn route_from_row(row: RouteRow) -> Option<RouteRecord> {
        let route = match serde_json::from_str(&row.route) {
            Ok(route) => route,
            Err(e) => {
                warn!(route_id = %row.route_id, error = %e, "Malformed route payload, treating as miss");
                return None;
            }
        };
        let trade_type = match row.trade_type.parse() {
            Ok(trade_type) => trade_type,
            Err(e) => {
                warn!(route_id = %row.route_id, error = %e, "Malformed route trade type, treating as miss");
                return None;
            }
        };
        Some(RouteRecord {
            route_id: row.route_id,
            chain_id: ChainId::new(u64::try_from(row.chain_id).ok()?),
            token_in_address: row.token_in_address,
            token_out_address: row.token_out_address,
            amount: row.amount,
            trade_type,
            route,
            created_at: row.created_at,
            ttl: row.ttl,
        })
    }

    /// Remove expired rows from every ttl-bearing table.
    ///
    /// Rows with `ttl == 0` or `ttl >= now` are untouched. Occasionally also
    /// runs `VACUUM`, per [`StoreOptions::vacuum_probability`].
    pub async fn cleanup(&self) -> Result<CleanupReport, StoreError> {
        let mut conn = self.conn()?;
        let now = self.clock.now();

        let mut report = CleanupReport::default();
        for table in TTL_TABLES {
            let removed = diesel::sql_query(format!(
                "DELETE FROM {table} WHERE ttl > 0 AND ttl < ?"
            ))
            .bind::<BigInt, _>(now)
            .execute(&mut conn)?;
            report.removed.push((table, removed));
        }

        if rand::random::<f64>() < self.options.vacuum_probability {
            diesel::sql_query("VACUUM").execute(&mut conn)?;
            report.vacuumed = true;
        }

        info!(
            removed = report.total_removed(),
            vacuumed = report.vacuumed,
            "Cache cleanup completed"
        );
        Ok(report)
    }

    /// Record the outcome of a provider check in one upsert.
    ///
    /// Unhealthy reports add one to the error count. Healthy reports keep it
    /// or reset it according to the configured [`ErrorCountPolicy`].
    pub async fn set_provider_health(
        &self,
        provider_name: &str,
        chain_id: ChainId,
        is_healthy: bool,
        error: Option<&str>,
    ) -> Result<(), StoreError> {
        use rpc_provider_health_state::dsl as h;

        let chain_id = chain_column(chain_id)?;
        let mut conn = self.conn()?;
        let row = NewProviderHealthRow {
            provider_name,
            chain_id,
            is_healthy,
            last_check: self.clock.now(),
            error_count: i32::from(!is_healthy),
            last_error: error,
        };
        let insert = diesel::insert_into(h::rpc_provider_health_state)
            .values(&row)
            .on_conflict((h::provider_name, h::chain_id))
            .do_update();

        match (is_healthy, self.options.error_count_policy) {
            (false, _) => insert
                .set((
                    h::is_healthy.eq(excluded(h::is_healthy)),
                    h::last_check.eq(excluded(h::last_check)),
                    h::last_error.eq(excluded(h::last_error)),
                    h::error_count.eq(h::error_count + 1),
                ))
                .execute(&mut conn)?,
            (true, ErrorCountPolicy::Accumulate) => insert
                .set((
                    h::is_healthy.eq(excluded(h::is_healthy)),
                    h::last_check.eq(excluded(h::last_check)),
                    h::last_error.eq(excluded(h::last_error)),
                ))
                .execute(&mut conn)?,
            (true, ErrorCountPolicy::ResetOnHealthy) => insert
                .set((
                    h::is_healthy.eq(excluded(h::is_healthy)),
                    h::last_check.eq(excluded(h::last_check)),
                    h::last_error.eq(excluded(h::last_error)),
                    h::error_count.eq(0),
                ))
                .execute(&mut conn)?,
        };

        debug!(provider = provider_name, chain_id, is_healthy, "Provider health recorded");
        Ok(())
    }

    /// Last reported health; providers never seen are assumed healthy.
    pub async fn get_provider_health(
        &self,
        provider_name: &str,
        chain_id: ChainId,
    ) -> Result<bool, StoreError> {
        let chain_id = chain_column(chain_id)?;
        let mut conn = self.conn()?;

        let healthy: Option<bool> = rpc_provider_health_state::table
            .find((provider_name, chain_id))
            .select(rpc_provider_health_state::is_healthy)
            .first(&mut conn)
            .optional()?;

        Ok(healthy.unwrap_or(true))
    }

    /// Full health record, for diagnostics.
    pub async fn provider_health(
        &self,
        provider_name: &str,
        chain_id: ChainId,
    ) -> Result<Option<ProviderHealthRecord>, StoreError> {
        let chain = chain_column(chain_id)?;
        let mut conn = self.conn()?;

        let row: Option<ProviderHealthRow> = rpc_provider_health_state::table
            .find((provider_name, chain))
            .select(ProviderHealthRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(|row| ProviderHealthRecord {
            provider_name: row.provider_name,
            chain_id,
            is_healthy: row.is_healthy,
            last_check: row.last_check,
            error_count: u32::try_from(row.error_count).unwrap_or(0),
            last_error: row.last_error,
        }))
    }
}

fn chain_column(chain_id: ChainId) -> Result<i64, StoreError> {
    i64::try_from(chain_id.get())
        .map_err(|_| StoreError::Database(format!("chain id {chain_id} out of range")))
}
