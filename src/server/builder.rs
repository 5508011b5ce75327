//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{EntityDescriptor, EntityRegistry};
use anyhow::{Result, bail};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the HTTP router serving every registered entity
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_base_path("/api")
///     .register(PizzaDescriptor::new(pizza_state))
///     .register(ToppingDescriptor::new(topping_state))
///     .build()?;
/// ```
pub struct ServerBuilder {
    entity_registry: EntityRegistry,
    base_path: String,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            entity_registry: EntityRegistry::new(),
            base_path: "/api".to_string(),
            custom_routes: Vec::new(),
        }
    }

    /// Prefix for entity routes; empty mounts them at the root
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Register an entity descriptor
    pub fn register(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Add routes mounted at the root, outside the base path
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    ///
    /// Entity routes are nested under the base path; `/health` and
    /// `/healthz` stay at the root. Requests are traced and CORS is
    /// permissive.
    pub fn build(self) -> Result<Router> {
        let base_path = self.base_path.trim_end_matches('/');
        if !base_path.is_empty() && !base_path.starts_with('/') {
            bail!("Base path must start with '/': {}", self.base_path);
        }

        let entity_routes = self.entity_registry.build_routes();
        tracing::debug!(
            "Mounting {:?} under '{}'",
            self.entity_registry.collection_paths(),
            base_path
        );

        let mut app = if base_path.is_empty() {
            health_routes().merge(entity_routes)
        } else {
            health_routes().nest(base_path, entity_routes)
        };
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME")
    }))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
