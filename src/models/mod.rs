//! Request and Response models for the order service
//!
//! This module defines the order record and the DTOs used for
//! serializing HTTP response bodies.

pub mod order;
pub mod responses;

// Re-export commonly used types
pub use order::{Delivery, Item, Order, Payment};
pub use responses::{CreatedResponse, ErrorResponse, HealthResponse, StatsResponse};
