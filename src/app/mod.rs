//! 应用层：状态与路由

pub mod auth;
pub mod foods;
pub mod health;
pub mod orders;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use self::{
    auth::service::TokenService, foods::service::FoodService, orders::service::OrderService,
};
use crate::config::{Config, CorsConfig, RejectionStatus};
use crate::core::middleware::{auth_middleware, request_logging_middleware};
use crate::infrastructure::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub foods: FoodService,
    pub orders: OrderService,
    pub tokens: TokenService,
    pub store: Arc<dyn Store>,
    pub rejection_status: RejectionStatus,
}

impl AppState {
    pub fn new<S: Store + 'static>(store: S, config: &Config) -> Self {
        let store = Arc::new(store);
        Self {
            foods: FoodService::new(store.clone()),
            orders: OrderService::new(store.clone(), store.clone()),
            tokens: TokenService::from_config(&config.auth),
            store,
            rejection_status: config.orders.rejection_status,
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// 构建完整路由
pub fn create_router(state: AppState, config: &Config) -> Router {
    let public = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/jwt", post(auth::handler::issue_token))
        .route("/logout", post(auth::handler::logout))
        .route("/foods", get(foods::handler::list_foods))
        .route("/foods/user/:email", get(foods::handler::foods_by_buyer))
        .route("/foods/:id", get(foods::handler::get_food))
        .route("/count/foods", get(foods::handler::count_foods))
        .route("/top/foods", get(foods::handler::top_foods));

    let protected = Router::new()
        .route("/foods", post(foods::handler::create_food))
        .route(
            "/foods/:id",
            patch(foods::handler::update_food).delete(foods::handler::delete_food),
        )
        .route(
            "/orders",
            get(orders::handler::list_orders).post(orders::handler::place_order),
        )
        .route("/orders/:id", delete(orders::handler::cancel_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // 自外向内：trace -> cors -> timeout -> 请求日志
    public
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.timeout_seconds,
                )))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}
