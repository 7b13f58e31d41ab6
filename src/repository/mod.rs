//! Repository Module
//!
//! The durable record store the cache sits in front of.

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Order;

pub use memory::InMemoryRepository;

/// Durable storage for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetches an order by id. `Ok(None)` means the store has no such order.
    async fn get_order(&self, id: &str) -> Result<Option<Order>>;

    /// Persists a new order. Fails if an order with the same id exists.
    async fn create_order(&self, order: &Order) -> Result<()>;
}
