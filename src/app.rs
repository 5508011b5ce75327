//! Application assembly: stores, services and the router built from config

use crate::config::{AppConfig, StorageBackend};
use crate::core::error::{ConfigError, PizzeriaResult};
use crate::core::service::QueryService;
use crate::core::store::EntityStore;
use crate::entities::pizza::{Pizza, PizzaDescriptor, PizzaService};
use crate::entities::topping::{Topping, ToppingAppState, ToppingDescriptor, ToppingService};
use crate::server::builder::ServerBuilder;
use crate::server::headers::HeaderUtil;
use crate::server::rest::RestState;
use crate::storage::InMemoryStore;
use axum::Router;
use std::sync::Arc;

/// One store per entity, shared by every service that reads it
#[derive(Clone)]
pub struct Stores {
    pub pizzas: Arc<dyn EntityStore<Pizza>>,
    pub toppings: Arc<dyn EntityStore<Topping>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            pizzas: Arc::new(InMemoryStore::<Pizza>::new()),
            toppings: Arc::new(InMemoryStore::<Topping>::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use crate::storage::PostgresStore;

        Self {
            pizzas: Arc::new(PostgresStore::<Pizza>::new(pool.clone())),
            toppings: Arc::new(PostgresStore::<Topping>::new(pool)),
        }
    }

    /// Open the backend named by `storage.backend`
    ///
    /// The postgres backend connects and creates missing tables first.
    pub async fn from_config(config: &AppConfig) -> PizzeriaResult<Self> {
        match config.storage.backend {
            StorageBackend::InMemory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => Self::open_postgres(config).await,
        }
    }

    #[cfg(feature = "postgres")]
    async fn open_postgres(config: &AppConfig) -> PizzeriaResult<Self> {
        use crate::storage::postgres;

        let url = config
            .storage
            .database_url
            .as_deref()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "storage.database_url".to_string(),
                message: "required by the postgres backend".to_string(),
            })?;
        let pool = postgres::connect(url, config.storage.max_connections).await?;
        postgres::ensure_schema(&pool).await?;
        tracing::info!("Using postgres storage");
        Ok(Self::postgres(pool))
    }

    #[cfg(not(feature = "postgres"))]
    async fn open_postgres(_config: &AppConfig) -> PizzeriaResult<Self> {
        Err(ConfigError::InvalidValue {
            key: "storage.backend".to_string(),
            message: "built without the `postgres` feature".to_string(),
        }
        .into())
    }
}

/// Server builder with every entity registered for `config`
pub fn server(config: &AppConfig, stores: Stores) -> ServerBuilder {
    let headers = HeaderUtil::new(config.application_name.clone());
    let base_path = config.base_path();

    let pizzas = RestState::new(
        PizzaService::new(stores.pizzas),
        headers.clone(),
        base_path,
        config.pagination.clone(),
    );
    let toppings = ToppingAppState {
        rest: RestState::new(
            ToppingService::new(stores.toppings.clone()),
            headers,
            base_path,
            config.pagination.clone(),
        ),
        query: QueryService::new(stores.toppings),
    };

    ServerBuilder::new()
        .with_base_path(base_path)
        .register(PizzaDescriptor::new(pizzas))
        .register(ToppingDescriptor::new(toppings))
}

/// Build the full router for `config` on top of `stores`
pub fn router(config: &AppConfig, stores: Stores) -> anyhow::Result<Router> {
    server(config, stores).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config_uses_memory() {
        let stores = Stores::from_config(&AppConfig::default()).await.unwrap();
        assert_eq!(stores.toppings.count_matching(&Default::default()).await.unwrap(), 0);
    }

    #[cfg(not(feature = "postgres"))]
    #[tokio::test]
    async fn test_postgres_requires_feature() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        config.storage.database_url = Some("postgres://localhost/pizzeria".to_string());

        let err = Stores::from_config(&config).await.err().unwrap();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_router_builds_from_defaults() {
        let config = AppConfig::default();
        assert!(router(&config, Stores::in_memory()).is_ok());
    }
}
