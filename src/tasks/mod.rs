//! Background Tasks Module
//!
//! Contains the long-running tasks started alongside the service.
//!
//! # Tasks
//! - Expiry sweeper: removes idle cache entries at a fixed interval
//! - Ingestion consumer: feeds incoming order messages into the service

mod ingest;
mod sweeper;

pub use ingest::spawn_ingest_task;
pub use sweeper::spawn_sweeper;
