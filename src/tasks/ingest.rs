//! Order Ingestion Task
//!
//! Consumes raw order messages and hands them to the order service.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::models::Order;
use crate::service::OrderService;

/// Spawns a consumer that decodes each message as a JSON [`Order`] and
/// processes it.
///
/// Malformed messages and processing failures are logged and skipped. The
/// task ends when `messages` closes or `shutdown` turns `true`.
pub fn spawn_ingest_task(
    service: Arc<OrderService>,
    mut messages: mpsc::Receiver<Vec<u8>>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Order ingestion started");

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let payload = tokio::select! {
                msg = messages.recv() => match msg {
                    Some(payload) => payload,
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            };

            let order: Order = match serde_json::from_slice(&payload) {
                Ok(order) => order,
                Err(err) => {
                    error!(error = %err, "Failed to decode order message");
                    continue;
                }
            };

            let order_uid = order.order_uid.clone();
            match service.process_order(order).await {
                Ok(()) => info!(order_uid = %order_uid, "Processed order"),
                Err(err) => error!(order_uid = %order_uid, error = %err, "Failed to process order"),
            }
        }

        info!("Order ingestion stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{BoundedCache, CacheConfig};
    use crate::repository::{InMemoryRepository, OrderRepository};
    use crate::service::test_order;
    use std::time::Duration;

    async fn service(
        shutdown: watch::Receiver<bool>,
    ) -> (Arc<OrderService>, Arc<InMemoryRepository>) {
        let cache = BoundedCache::new(&CacheConfig::default(), Order::cache_key, shutdown)
            .await
            .unwrap();
        let repo = Arc::new(InMemoryRepository::new());
        let service = Arc::new(OrderService::new(repo.clone(), Arc::new(cache)));
        (service, repo)
    }

    #[tokio::test]
    async fn test_ingest_processes_valid_and_skips_bad_messages() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (service, repo) = service(shutdown_rx.clone()).await;
        let (tx, rx) = mpsc::channel(8);

        let handle = spawn_ingest_task(service.clone(), rx, shutdown_rx);

        tx.send(b"not an order".to_vec()).await.unwrap();
        tx.send(serde_json::to_vec(&test_order("o1")).unwrap()).await.unwrap();
        tx.send(serde_json::to_vec(&test_order("")).unwrap()).await.unwrap();
        tx.send(serde_json::to_vec(&test_order("o2")).unwrap()).await.unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("ingest should stop when the channel closes")
            .unwrap();

        assert_eq!(repo.len().await, 2);
        assert!(repo.get_order("o2").await.unwrap().is_some());
        assert!(service.cache().contains_key("o1").await);
        assert!(service.cache().contains_key("o2").await);
    }

    #[tokio::test]
    async fn test_ingest_stops_on_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (service, _repo) = service(shutdown_rx.clone()).await;
        let (_tx, rx) = mpsc::channel::<Vec<u8>>(8);

        let handle = spawn_ingest_task(service, rx, shutdown_rx);
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("ingest should stop on shutdown")
            .unwrap();
    }
}
