//! API Handlers
//!
//! HTTP request handlers for each order service endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::{BoundedCache, CacheConfig};
use crate::error::{CacheError, Result};
use crate::models::{CreatedResponse, HealthResponse, Order, StatsResponse};
use crate::repository::OrderRepository;
use crate::service::OrderService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Order operations (cache + durable store)
    pub orders: Arc<OrderService>,
    /// The order cache, for statistics
    pub cache: Arc<BoundedCache<Order>>,
}

impl AppState {
    /// Creates a new AppState over an existing cache and repository.
    pub fn new(cache: Arc<BoundedCache<Order>>, repo: Arc<dyn OrderRepository>) -> Self {
        let orders = Arc::new(OrderService::new(repo, cache.clone()));
        Self { orders, cache }
    }

    /// Builds the order cache from configuration and wraps it in an AppState.
    ///
    /// Must be called from within a Tokio runtime; the cache's sweeper is
    /// spawned here and stops when `shutdown` flips.
    pub async fn from_config(
        config: &CacheConfig,
        repo: Arc<dyn OrderRepository>,
        shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> Result<Self> {
        let cache = BoundedCache::new(config, Order::cache_key, shutdown).await?;
        Ok(Self::new(Arc::new(cache), repo))
    }
}

/// Handler for GET /api/order/:id
///
/// Returns the order, from the cache when possible.
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let order = state.orders.get_order_by_id(&id).await?;
    Ok(Json(order))
}

/// Handler for POST /api/order
///
/// Persists a new order and caches it.
pub async fn create_order_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Order>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    // Malformed bodies are client errors, whatever axum's default status
    let Json(order) =
        payload.map_err(|rejection| CacheError::InvalidRequest(rejection.body_text()))?;

    let order_uid = order.order_uid.clone();
    state.orders.process_order(order).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(order_uid))))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    let capacity = state.cache.capacity().await;

    Json(StatsResponse::new(&stats, capacity))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use crate::service::test_order;
    use tokio::sync::watch;

    async fn test_state() -> (AppState, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let repo = Arc::new(InMemoryRepository::new());
        let state = AppState::from_config(&CacheConfig::default(), repo, rx)
            .await
            .unwrap();
        (state, tx)
    }

    #[tokio::test]
    async fn test_create_and_get_handler() {
        let (state, _tx) = test_state().await;

        let result = create_order_handler(State(state.clone()), Ok(Json(test_order("o1")))).await;
        let (status, body) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.order_uid, "o1");

        let result = get_order_handler(State(state), Path("o1".to_string())).await;
        assert_eq!(result.unwrap().order_uid, "o1");
    }

    #[tokio::test]
    async fn test_get_unknown_order() {
        let (state, _tx) = test_state().await;

        let result = get_order_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_order() {
        let (state, _tx) = test_state().await;

        let result = create_order_handler(State(state), Ok(Json(test_order("")))).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _tx) = test_state().await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, CacheConfig::default().capacity);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
