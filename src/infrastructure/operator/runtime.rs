//! Runtime operator implementation.

use std::time::Duration;

use async_trait::async_trait;
use tokio::signal;
use tracing::{info, warn};

use crate::error::Result;
use crate::infrastructure::builder::ContainerBuilder;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::maintenance::spawn_maintenance;
use crate::port::inbound::operator::runtime::{RuntimeOperator, ServeRequest};

use super::{entry::Operator, shared};

#[async_trait]
impl RuntimeOperator for Operator {
    async fn serve(&self, request: ServeRequest) -> Result<()> {
        let mut config = shared::load_config(&request.config_toml)?;
        Self::apply_serve_overrides(&mut config, &request);
        config.init_logging();

        info!(
            database = %config.store.path,
            primary_chain = config.resolver.primary_chain,
            "routekeeper starting"
        );

        let store = shared::open_store(&config)?;
        let cleanup_period = Duration::from_secs(config.store.cleanup_interval_secs);
        let resolver = config.resolver.resolver();

        let container = match ContainerBuilder::new(config)
            .store(store.clone())
            .build()
            .await
        {
            Ok(container) => container,
            Err(e) => {
                store.close();
                return Err(e);
            }
        };

        info!(
            activity_id = %container.activity_id(),
            loaded_chains = ?container.loaded_chains(),
            "Container ready"
        );
        if let Err(e) = resolver.resolve(&container, None, None) {
            warn!(error = %e, "Primary chain is not loaded");
        }

        let maintenance = spawn_maintenance(store.clone(), cleanup_period);

        let interrupted = signal::ctrl_c().await;
        info!("Shutdown signal received (Ctrl+C)");
        maintenance.abort();
        store.close();
        info!("routekeeper stopped");

        interrupted?;
        Ok(())
    }
}

impl Operator {
    fn apply_serve_overrides(config: &mut Config, request: &ServeRequest) {
        if let Some(ref log_level) = request.log_level {
            config.logging.level = log_level.clone();
        }

        if request.json_logs {
            config.logging.format = "json".to_string();
        }

        if let Some(ref path) = request.database_path {
            config.store.path = path.clone();
        }
    }
}
