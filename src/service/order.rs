//! Order Service
//!
//! Read-through lookups and ingestion for orders.

use std::sync::Arc;

use tracing::{error, info};

use crate::cache::BoundedCache;
use crate::error::{CacheError, Result};
use crate::models::Order;
use crate::repository::OrderRepository;

/// Serves orders from the cache, falling back to the durable store.
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    cache: Arc<BoundedCache<Order>>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, cache: Arc<BoundedCache<Order>>) -> Self {
        Self { repo, cache }
    }

    /// Returns the order with `id`.
    ///
    /// A cache miss is served from the repository and the result is written
    /// back into the cache. Failing to cache it is logged, not returned.
    pub async fn get_order_by_id(&self, id: &str) -> Result<Order> {
        if let Some(order) = self.cache.get(id).await {
            info!(order_uid = %id, "Cache HIT for order");
            return Ok(order);
        }

        info!(order_uid = %id, "Cache MISS for order");

        let order = self
            .repo
            .get_order(id)
            .await?
            .ok_or_else(|| CacheError::NotFound(id.to_string()))?;

        if let Err(err) = self.cache.set(order.clone()).await {
            error!(order_uid = %id, error = %err, "Failed to cache order");
        }

        Ok(order)
    }

    /// Validates and persists `order`, then caches it.
    ///
    /// Nothing is cached unless the store accepted the order.
    pub async fn process_order(&self, order: Order) -> Result<()> {
        if let Some(msg) = order.validate() {
            return Err(CacheError::InvalidRequest(msg));
        }

        self.repo.create_order(&order).await?;

        let order_uid = order.order_uid.clone();
        if let Err(err) = self.cache.set(order).await {
            error!(order_uid = %order_uid, error = %err, "Failed to cache order");
        }
        Ok(())
    }

    pub fn cache(&self) -> &Arc<BoundedCache<Order>> {
        &self.cache
    }
}

#[cfg(test)]
pub(crate) fn test_order(uid: &str) -> Order {
    use crate::models::{Delivery, Item, Payment};

    Order {
        order_uid: uid.to_string(),
        track_number: "WBILMTESTTRACK".to_string(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: "Test Testov".to_string(),
            phone: "+9720000000".to_string(),
            zip: "2639809".to_string(),
            city: "Kiryat Mozkin".to_string(),
            address: "Ploshad Mira 15".to_string(),
            region: "Kraiot".to_string(),
            email: "test@gmail.com".to_string(),
        },
        payment: Payment {
            transaction: uid.to_string(),
            request_id: String::new(),
            currency: "USD".to_string(),
            provider: "wbpay".to_string(),
            amount: 1817,
            payment_dt: 1637907727,
            bank: "alpha".to_string(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: vec![Item {
            chrt_id: 9934930,
            track_number: "WBILMTESTTRACK".to_string(),
            price: 453,
            rid: "ab4219087a764ae0btest".to_string(),
            name: "Mascaras".to_string(),
            sale: 30,
            size: "0".to_string(),
            total_price: 317,
            nm_id: 2389212,
            brand: "Vivienne Sabo".to_string(),
            status: 202,
        }],
        locale: "en".to_string(),
        internal_signature: String::new(),
        customer_id: "test".to_string(),
        delivery_service: "meest".to_string(),
        shardkey: "9".to_string(),
        sm_id: 99,
        date_created: chrono::DateTime::parse_from_rfc3339("2021-11-26T06:22:19Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
        oof_shard: "1".to_string(),
    }
}
