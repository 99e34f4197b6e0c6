//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{cache, routes, rpc_provider_health_state};

/// Database row for a generic cache entry.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CacheRow {
    pub key: String,
    pub value: String,
    pub ttl: i64,
    pub created_at: i64,
}

/// Database row for a structured route entry.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = routes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RouteRow {
    pub route_id: String,
    pub chain_id: i64,
    pub token_in_address: String,
    pub token_out_address: String,
    pub amount: String,
    pub trade_type: String,
    pub route: String,
    pub created_at: i64,
    pub ttl: i64,
}

/// Database row for provider health (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = rpc_provider_health_state)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProviderHealthRow {
    pub provider_name: String,
    pub chain_id: i64,
    pub is_healthy: bool,
    pub last_check: i64,
    pub error_count: i32,
    pub last_error: Option<String>,
}

/// Database row for provider health (insertable).
///
/// `error_count` is the count for a brand-new row; existing rows are
/// adjusted in the upsert's conflict clause.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = rpc_provider_health_state)]
pub struct NewProviderHealthRow<'a> {
    pub provider_name: &'a str,
    pub chain_id: i64,
    pub is_healthy: bool,
    pub last_check: i64,
    pub error_count: i32,
    pub last_error: Option<&'a str>,
}
