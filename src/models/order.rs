//! Order record
//!
//! The value type cached by the service, as stored in the durable store and
//! received from the ingestion channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum allowed `order_uid` length in bytes
pub const MAX_ORDER_UID_LENGTH: usize = 256;

/// A customer order with its delivery, payment and line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub delivery: Delivery,
    pub payment: Payment,
    pub items: Vec<Item>,
    pub locale: String,
    #[serde(default)]
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i64,
    pub date_created: DateTime<Utc>,
    pub oof_shard: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub transaction: String,
    #[serde(default)]
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    /// Unix seconds
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i64,
    pub rid: String,
    pub name: String,
    pub sale: i64,
    pub size: String,
    pub total_price: i64,
    pub nm_id: i64,
    pub brand: String,
    pub status: i64,
}

impl Order {
    /// Cache key of an order.
    pub fn cache_key(order: &Order) -> String {
        order.order_uid.clone()
    }

    /// Validates the order before it is persisted.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.order_uid.is_empty() {
            return Some("order_uid cannot be empty".to_string());
        }
        if self.order_uid.len() > MAX_ORDER_UID_LENGTH {
            return Some(format!(
                "order_uid exceeds maximum length of {} bytes",
                MAX_ORDER_UID_LENGTH
            ));
        }
        if self.payment.amount < 0 {
            return Some("payment amount cannot be negative".to_string());
        }
        None
    }
}
