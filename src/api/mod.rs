//! API Module
//!
//! HTTP handlers and routing for the order service REST API.
//!
//! # Endpoints
//! - `GET /api/order/:id` - Fetch an order
//! - `POST /api/order` - Store a new order
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
