//! Order board WebSocket: realtime order push
//!
//! GET /api/owner/orders/live?token=<JWT>
//! Auth: JWT in the query string (browser WebSocket cannot set headers)
//!
//! Protocol (push only):
//! - `Ready` with the full board on connect and after falling behind
//! - `OrderCreated` with a notification for each checkout
//! - `OrderUpdated` patches for status changes

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::live::{LiveMessage, OrderNotification};
use shared::order::OrderBoard;
use shared::util::now_millis;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::guards::{DashboardUser, StaffContext};
use crate::auth::session::authenticate;
use crate::db;
use crate::live::LiveHubEvent;
use crate::state::AppState;

/// Maximum concurrent board sockets per restaurant
const MAX_LIVE_WS_PER_RESTAURANT: usize = 10;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: String,
}

/// GET /api/owner/orders/live?token=<JWT>
pub async fn handle_live_orders_ws(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let user = authenticate(&state, &query.token)?;
    let staff = StaffContext::try_from(DashboardUser::load(&state, user).await?)?;
    let restaurant_id = staff.restaurant_id;

    let slot = LiveSlot::acquire(&state.live_connections, restaurant_id).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::LiveConnectionLimit,
            format!("Too many board connections (max {MAX_LIVE_WS_PER_RESTAURANT})"),
        )
    })?;

    let user_id = staff.user.user_id;
    // The slot moves into the callback, so a failed upgrade still frees it
    Ok(ws.on_upgrade(move |socket| async move {
        live_ws_session(socket, state, restaurant_id, user_id).await;
        drop(slot);
    }))
}

/// One reserved board socket for a restaurant, released on drop
struct LiveSlot {
    connections: Arc<DashMap<i64, AtomicUsize>>,
    restaurant_id: i64,
}

impl LiveSlot {
    /// Reserve a slot, or `None` when the restaurant is at the cap
    fn acquire(connections: &Arc<DashMap<i64, AtomicUsize>>, restaurant_id: i64) -> Option<Self> {
        // The entry guard locks the shard, so concurrent upgrades cannot overshoot
        let counter = connections
            .entry(restaurant_id)
            .or_insert_with(|| AtomicUsize::new(0));
        if counter.fetch_add(1, Ordering::SeqCst) >= MAX_LIVE_WS_PER_RESTAURANT {
            counter.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(Self {
            connections: Arc::clone(connections),
            restaurant_id,
        })
    }
}

impl Drop for LiveSlot {
    fn drop(&mut self) {
        if let Some(counter) = self.connections.get(&self.restaurant_id) {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
        self.connections
            .remove_if(&self.restaurant_id, |_, c| c.load(Ordering::SeqCst) == 0);
    }
}

async fn live_ws_session(socket: WebSocket, state: AppState, restaurant_id: i64, user_id: String) {
    let (mut sink, mut stream) = socket.split();

    tracing::info!(restaurant_id, user_id = %user_id, "Order board connected");

    // Subscribe before reading the snapshot so nothing falls in between
    let mut hub_rx = state.live_orders.subscribe(restaurant_id);

    if send_snapshot(&state, restaurant_id, &mut sink).await.is_ok() {
        let mut ping_interval = tokio::time::interval(PING_INTERVAL);
        ping_interval.tick().await; // skip immediate

        loop {
            tokio::select! {
                _ = ping_interval.tick() => {
                    if sink.send(Message::Ping(axum::body::Bytes::new())).await.is_err() {
                        break;
                    }
                }

                event = hub_rx.recv() => {
                    match event {
                        Ok(hub_event) => {
                            if send_message(&mut sink, &to_message(hub_event)).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(
                                restaurant_id,
                                lagged = n,
                                "Order board lagged, resending snapshot"
                            );
                            hub_rx = state.live_orders.subscribe(restaurant_id);
                            if send_snapshot(&state, restaurant_id, &mut sink).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(_)) => break,
                        // Boards only listen; pongs and stray frames are ignored
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }

    drop(hub_rx);
    state.live_orders.release(restaurant_id);

    tracing::info!(restaurant_id, user_id = %user_id, "Order board disconnected");
}

fn to_message(event: LiveHubEvent) -> LiveMessage {
    match event {
        LiveHubEvent::OrderCreated(order) => LiveMessage::OrderCreated {
            notification: OrderNotification::new_order(&order),
            order,
        },
        LiveHubEvent::OrderUpdated(patch) => LiveMessage::OrderUpdated { patch },
    }
}

/// Load the board from the database and send it as `Ready`
async fn send_snapshot<S>(state: &AppState, restaurant_id: i64, sink: &mut S) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let orders = db::orders::list_board(&state.pool, restaurant_id)
        .await
        .map_err(|e| {
            tracing::error!(restaurant_id, "Board snapshot query failed: {e}");
        })?;
    let board = OrderBoard::build(orders, now_millis());
    send_message(sink, &LiveMessage::Ready { board }).await
}

async fn send_message<S>(sink: &mut S, msg: &LiveMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::live::OrderPatch;
    use shared::models::{Order, OrderWithItems};
    use shared::order::OrderStatus;

    #[test]
    fn created_event_carries_notification() {
        let order = OrderWithItems {
            order: Order {
                id: 1,
                restaurant_id: 1,
                table_id: None,
                table_number: Some("5".to_string()),
                linked_table_number: None,
                customer_name: None,
                notes: None,
                status: OrderStatus::Pending,
                total_amount: Decimal::new(1500, 2),
                created_at: 0,
            },
            items: vec![],
        };
        match to_message(LiveHubEvent::OrderCreated(Box::new(order))) {
            LiveMessage::OrderCreated { notification, .. } => {
                assert_eq!(notification.title, "New Order Received!");
                assert_eq!(notification.description, "5 - Guest");
                assert!(notification.play_sound);
            }
            other => panic!("Expected OrderCreated, got {other:?}"),
        }
    }

    #[test]
    fn updated_event_serializes_as_patch() {
        let msg = to_message(LiveHubEvent::OrderUpdated(OrderPatch {
            id: 9,
            status: OrderStatus::Ready,
            total_amount: None,
        }));
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "OrderUpdated");
        assert_eq!(v["patch"]["status"], "ready");
        assert!(v["patch"].get("total_amount").is_none());
    }

    #[test]
    fn slots_are_capped_per_restaurant() {
        let connections = Arc::new(DashMap::new());
        let held: Vec<LiveSlot> = (0..MAX_LIVE_WS_PER_RESTAURANT)
            .map(|_| LiveSlot::acquire(&connections, 1).unwrap())
            .collect();
        assert!(LiveSlot::acquire(&connections, 1).is_none());

        // Other restaurants are unaffected
        let other = LiveSlot::acquire(&connections, 2).unwrap();
        drop(other);
        assert!(!connections.contains_key(&2));

        drop(held);
        assert!(connections.is_empty());
    }

    #[test]
    fn dropped_slot_is_reusable() {
        let connections = Arc::new(DashMap::new());
        let mut held: Vec<LiveSlot> = (0..MAX_LIVE_WS_PER_RESTAURANT)
            .map(|_| LiveSlot::acquire(&connections, 7).unwrap())
            .collect();

        // A slot that never reached a session (failed upgrade) is dropped unused
        held.pop();
        let again = LiveSlot::acquire(&connections, 7);
        assert!(again.is_some());
        assert_eq!(
            connections.get(&7).unwrap().load(Ordering::SeqCst),
            MAX_LIVE_WS_PER_RESTAURANT
        );
    }
}
