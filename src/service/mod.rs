//! Service Module
//!
//! Business operations on orders, combining the cache with the durable store.

mod order;

pub use order::OrderService;

#[cfg(test)]
pub(crate) use order::test_order;
