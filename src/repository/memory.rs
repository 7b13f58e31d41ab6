//! In-memory order store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::OrderRepository;
use crate::error::{CacheError, Result};
use crate::models::Order;

/// Process-local [`OrderRepository`] backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn get_order(&self, id: &str) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn create_order(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.order_uid) {
            return Err(CacheError::Repository(format!(
                "order {} already exists",
                order.order_uid
            )));
        }
        orders.insert(order.order_uid.clone(), order.clone());
        Ok(())
    }
}
