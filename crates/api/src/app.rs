use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    ApplicationStore, DeliveryStore, InMemoryPushStore, MessageStore, PushConnector, PushService,
    StatisticsAggregator,
};
use persistence::repositories::{
    ApplicationRepository, DeviceMessageRepository, PushMessageRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, ConnectorConfig};
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, messages, push, statistics};
use crate::services::{DisabledPushConnector, GatewayError, HttpPushConnector};

/// Record stores behind the push services.
#[derive(Clone)]
pub struct Stores {
    pub applications: Arc<dyn ApplicationStore>,
    pub messages: Arc<dyn MessageStore>,
    pub deliveries: Arc<dyn DeliveryStore>,
    /// Pool behind the stores when they are PostgreSQL-backed.
    pub pool: Option<PgPool>,
}

impl Stores {
    /// PostgreSQL-backed stores.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            applications: Arc::new(ApplicationRepository::new(pool.clone())),
            messages: Arc::new(PushMessageRepository::new(pool.clone())),
            deliveries: Arc::new(DeviceMessageRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Stores sharing one in-memory state.
    pub fn in_memory(store: Arc<InMemoryPushStore>) -> Self {
        Self {
            applications: store.clone(),
            messages: store.clone(),
            deliveries: store,
            pool: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub push: PushService,
    pub statistics: StatisticsAggregator,
    pub messages: Arc<dyn MessageStore>,
    pub deliveries: Arc<dyn DeliveryStore>,
    pub pool: Option<PgPool>,
}

/// Builds the gateway connector; a disabled config yields a connector
/// that reports every dispatch as unavailable.
pub fn build_connector(config: &ConnectorConfig) -> Result<Arc<dyn PushConnector>, GatewayError> {
    match HttpPushConnector::new(config) {
        Ok(connector) => {
            tracing::info!(base_url = %config.base_url, "Push gateway connector enabled");
            Ok(Arc::new(connector))
        }
        Err(GatewayError::NotEnabled) => {
            tracing::warn!("Push gateway connector disabled; admin pushes will be rejected");
            Ok(Arc::new(DisabledPushConnector))
        }
        Err(e) => Err(e),
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, GatewayError> {
    let connector = build_connector(&config.connector)?;
    Ok(create_app_with(config, Stores::postgres(pool), connector))
}

/// Builds the router over arbitrary stores and connector.
pub fn create_app_with(
    config: Config,
    stores: Stores,
    connector: Arc<dyn PushConnector>,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        config: config.clone(),
        push: PushService::new(
            stores.applications,
            stores.messages.clone(),
            stores.deliveries.clone(),
            connector,
        ),
        statistics: StatisticsAggregator::new(stores.messages.clone()),
        messages: stores.messages,
        deliveries: stores.deliveries,
        pool: stores.pool,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let push_routes = Router::new()
        .route("/api/v1/push/server", post(push::server_push))
        .route("/api/v1/push/admin", post(push::admin_push))
        .route("/api/v1/push/admin/messages", get(messages::list_messages))
        .route(
            "/api/v1/push/admin/messages/:message_id/deliveries",
            get(messages::list_deliveries),
        )
        .route("/api/v1/push/admin/chart", get(statistics::chart_info));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(push_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
