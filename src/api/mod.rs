use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, StoreAuthService};
use metrics_exporter_prometheus::PrometheusHandle;

pub mod auth;
mod cors;
mod error;
mod health;
mod observability;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(create_app_state(config, store, prometheus_handle))
}

#[must_use]
pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let auth = Arc::new(StoreAuthService::new(
        Arc::new(store.clone()),
        config.security.clone(),
    ));

    Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route(
            "/auth/login",
            post(auth::login)
                .fallback(auth::method_not_allowed)
                .layer(cors::policy(&origins, &[Method::POST], &[CONTENT_TYPE])),
        )
        .route(
            "/auth/me",
            get(auth::session)
                .fallback(auth::method_not_allowed)
                .layer(cors::policy(
                    &origins,
                    &[Method::GET],
                    &[CONTENT_TYPE, AUTHORIZATION],
                )),
        )
        .route(
            "/auth/setup",
            post(auth::setup)
                .fallback(auth::method_not_allowed)
                .layer(cors::policy(&origins, &[Method::POST], &[CONTENT_TYPE])),
        )
        .route("/health", get(health::health));

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
