//! LiveOrderHub: per-restaurant order change fan-out
//!
//! ```text
//! checkout / status handlers
//!       │ OrderCreated / OrderUpdated
//!       ▼
//! LiveOrderHub
//!   └── restaurants: restaurant_id → broadcast::Sender<LiveHubEvent>
//!         │
//!         ▼
//!   order board WS sessions (one receiver each)
//! ```
//!
//! The database stays the source of truth: the hub caches nothing, a new or
//! lagging board reloads its snapshot from PostgreSQL.

use dashmap::DashMap;
use shared::live::OrderPatch;
use shared::models::OrderWithItems;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub enum LiveHubEvent {
    OrderCreated(Box<OrderWithItems>),
    OrderUpdated(OrderPatch),
}

/// Broadcast channel capacity, enough to absorb a burst of checkouts
const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct LiveOrderHub {
    restaurants: Arc<DashMap<i64, broadcast::Sender<LiveHubEvent>>>,
}

impl LiveOrderHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// New order for a restaurant. Returns the number of boards reached.
    pub fn publish_created(&self, restaurant_id: i64, order: OrderWithItems) -> usize {
        self.publish(restaurant_id, LiveHubEvent::OrderCreated(Box::new(order)))
    }

    /// Status (and optionally total) change for an order
    pub fn publish_updated(&self, restaurant_id: i64, patch: OrderPatch) -> usize {
        self.publish(restaurant_id, LiveHubEvent::OrderUpdated(patch))
    }

    fn publish(&self, restaurant_id: i64, event: LiveHubEvent) -> usize {
        let delivered = match self.restaurants.get(&restaurant_id) {
            // No entry means no board is listening
            None => return 0,
            Some(tx) => tx.send(event).unwrap_or(0),
        };
        if delivered == 0 {
            self.release(restaurant_id);
        }
        delivered
    }

    pub fn subscribe(&self, restaurant_id: i64) -> broadcast::Receiver<LiveHubEvent> {
        self.restaurants
            .entry(restaurant_id)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Drop the restaurant's channel once nobody listens any more
    pub fn release(&self, restaurant_id: i64) {
        self.restaurants
            .remove_if(&restaurant_id, |_, tx| tx.receiver_count() == 0);
    }

    /// Number of restaurants with at least one open channel
    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::Order;
    use shared::order::OrderStatus;

    fn make_order(restaurant_id: i64, id: i64) -> OrderWithItems {
        OrderWithItems {
            order: Order {
                id,
                restaurant_id,
                table_id: None,
                table_number: None,
                linked_table_number: None,
                customer_name: Some("Ana".to_string()),
                notes: None,
                status: OrderStatus::Pending,
                total_amount: Decimal::new(1000, 2),
                created_at: 0,
            },
            items: vec![],
        }
    }

    fn patch(id: i64, status: OrderStatus) -> OrderPatch {
        OrderPatch {
            id,
            status,
            total_amount: None,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_created_then_updated() {
        let hub = LiveOrderHub::new();
        let mut rx = hub.subscribe(1);

        assert_eq!(hub.publish_created(1, make_order(1, 10)), 1);
        match rx.recv().await.unwrap() {
            LiveHubEvent::OrderCreated(order) => assert_eq!(order.order.id, 10),
            other => panic!("Expected OrderCreated, got {other:?}"),
        }

        hub.publish_updated(1, patch(10, OrderStatus::Preparing));
        match rx.recv().await.unwrap() {
            LiveHubEvent::OrderUpdated(p) => {
                assert_eq!(p.id, 10);
                assert_eq!(p.status, OrderStatus::Preparing);
            }
            other => panic!("Expected OrderUpdated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn restaurant_isolation() {
        let hub = LiveOrderHub::new();
        let mut rx_a = hub.subscribe(1);
        let mut rx_b = hub.subscribe(2);

        hub.publish_created(1, make_order(1, 100));

        match rx_a.recv().await.unwrap() {
            LiveHubEvent::OrderCreated(order) => assert_eq!(order.order.restaurant_id, 1),
            other => panic!("Expected OrderCreated, got {other:?}"),
        }
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let hub = LiveOrderHub::new();
        assert_eq!(hub.publish_created(7, make_order(7, 1)), 0);
        assert_eq!(hub.restaurant_count(), 0);
    }

    #[test]
    fn idle_channel_is_cleaned_up() {
        let hub = LiveOrderHub::new();
        let rx = hub.subscribe(3);
        assert_eq!(hub.restaurant_count(), 1);

        // Still listening: release is a no-op
        hub.release(3);
        assert_eq!(hub.restaurant_count(), 1);

        drop(rx);
        hub.release(3);
        assert_eq!(hub.restaurant_count(), 0);
    }

    #[test]
    fn publish_after_last_receiver_dropped_cleans_up() {
        let hub = LiveOrderHub::new();
        drop(hub.subscribe(4));
        assert_eq!(hub.restaurant_count(), 1);
        assert_eq!(hub.publish_updated(4, patch(1, OrderStatus::Ready)), 0);
        assert_eq!(hub.restaurant_count(), 0);
    }

    #[tokio::test]
    async fn lagging_subscriber_sees_lagged() {
        let hub = LiveOrderHub::new();
        let mut rx = hub.subscribe(5);
        for i in 0..(BROADCAST_CAPACITY as i64 + 5) {
            hub.publish_updated(5, patch(i, OrderStatus::Ready));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
