//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::forwarder::Forwarder;
use crate::metrics::Metrics;
use crate::providers::{self, Provider, StoreProvider};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL pool, when a store is configured.
    db: Option<PgPool>,

    /// Provider behind the store route.
    store: Option<Forwarder>,

    /// Provider behind the notify route.
    notify: Option<Forwarder>,

    metrics: Arc<Metrics>,
}

impl AppState {
    /// Connect to the store (if configured) and build both forwarders.
    pub async fn new(config: &Config) -> Result<Self> {
        let client = providers::http_client(config)?;

        let db = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.database_max_connections)
                    .await
                    .context("failed to create database pool")?;
                Some(pool)
            }
            None => None,
        };

        let store: Option<Arc<dyn Provider>> = match &db {
            Some(pool) => {
                let store = StoreProvider::new(pool.clone());
                store
                    .ensure_schema()
                    .await
                    .context("failed to create submission tables")?;
                Some(Arc::new(store))
            }
            None => None,
        };

        let notify = providers::notify_provider(config, &client);

        info!(
            store = store.is_some(),
            notify = config.notify.name(),
            "providers wired"
        );

        Ok(Self::from_parts(db, store, notify, Arc::new(Metrics::new())))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        db: Option<PgPool>,
        store: Option<Arc<dyn Provider>>,
        notify: Option<Arc<dyn Provider>>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let store = store.map(|p| Forwarder::new(p, metrics.clone()));
        let notify = notify.map(|p| Forwarder::new(p, metrics.clone()));
        Self {
            inner: Arc::new(AppStateInner {
                db,
                store,
                notify,
                metrics,
            }),
        }
    }

    /// Forwarder for `POST /functions/v1/submit-form`.
    pub fn store(&self) -> Option<&Forwarder> {
        self.inner.store.as_ref()
    }

    /// Forwarder for `POST /functions/v1/send-email`.
    pub fn notify(&self) -> Option<&Forwarder> {
        self.inner.notify.as_ref()
    }

    /// Get the metrics registry.
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.inner.metrics
    }

    /// Check if PostgreSQL is healthy. None when no store is configured.
    pub async fn postgres_healthy(&self) -> Option<bool> {
        match &self.inner.db {
            Some(pool) => Some(db::check_health(pool).await),
            None => None,
        }
    }
}
