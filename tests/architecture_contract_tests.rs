//! Architecture contract tests.

mod support;

use support::architecture::{
    find_definitions_in_mod_files, find_lines_containing, path_exists, read_relative,
};

#[test]
fn cli_has_no_direct_infrastructure_imports() {
    let hits = find_lines_containing(
        "src/adapter/inbound/cli",
        &["use crate::infrastructure", "crate::infrastructure::"],
    );

    assert!(
        hits.is_empty(),
        "found direct infrastructure imports in inbound CLI adapters: {hits:#?}"
    );
}

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(
        hits.is_empty(),
        "ports should only depend on domain types: {hits:#?}"
    );
}

#[test]
fn application_layer_has_no_adapter_or_infrastructure_imports() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter::", "crate::infrastructure::", "diesel::", "reqwest::"],
    );
    assert!(
        hits.is_empty(),
        "application layer should only see ports and domain: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_definitions_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found definitions in mod.rs files: {violations:#?}"
    );
}

#[test]
fn cli_operator_bridge_uses_operator_name() {
    let source = read_relative("src/adapter/inbound/cli/operator.rs");
    assert!(
        source.contains("pub fn operator() -> &'static dyn OperatorPort"),
        "operator bridge should expose `operator()` capability accessor"
    );
}

#[test]
fn operator_ports_are_transport_agnostic() {
    let hits = find_lines_containing("src/port/inbound/operator", &["std::path::Path", "PathBuf"]);
    assert!(
        hits.is_empty(),
        "operator inbound ports should not expose filesystem path types: {hits:#?}"
    );
}

#[test]
fn cache_store_is_the_only_diesel_user() {
    let hits = find_lines_containing("src", &["use diesel"]);
    let outside: Vec<_> = hits
        .into_iter()
        .filter(|(path, _, _)| !path.starts_with("src/adapter/outbound/sqlite/"))
        .collect();
    assert!(
        outside.is_empty(),
        "diesel should stay inside the sqlite adapter: {outside:#?}"
    );
}

#[test]
fn embedded_migrations_are_present() {
    assert!(
        path_exists("migrations/2025-06-01-000000_create_cache_tables/up.sql"),
        "cache table migration should be embedded from migrations/"
    );
    let up = read_relative("migrations/2025-06-01-000000_create_cache_tables/up.sql");
    for table in [
        "cache",
        "routes",
        "cached_routes",
        "pool_cache",
        "cached_v3_pools",
        "cached_v2_pairs",
        "token_properties_cache",
        "rpc_provider_health_state",
    ] {
        assert!(
            up.contains(&format!("CREATE TABLE {table}"))
                || up.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
            "migration should create `{table}`"
        );
    }
}
