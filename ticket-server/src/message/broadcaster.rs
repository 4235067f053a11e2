//! 工单事件广播器
//!
//! # 架构
//!
//! ```text
//! TicketService ──▶ Broadcaster ──┬──▶ Observer A (mpsc) ──▶ WebSocket A
//!                                 ├──▶ Observer B (mpsc) ──▶ WebSocket B
//!                                 └──▶ ...
//! ```
//!
//! 每个观察者持有一个有界队列和一组房间。全局广播发送给所有观察者，
//! 房间广播只发送给当前在该房间内的观察者。
//!
//! - 队列已满: 该观察者丢弃本条事件 (慢消费者不阻塞写路径，也不无限占用内存)
//! - 队列已关闭: 发送结束后移除该观察者

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use shared::message::TicketEvent;
use shared::models::Ticket;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Events buffered per observer before new ones are dropped for it
pub const OBSERVER_QUEUE_CAPACITY: usize = 256;

#[derive(Debug)]
struct Observer {
    tx: mpsc::Sender<TicketEvent>,
    rooms: HashSet<String>,
}

/// A connected observer: its id and the queue its events arrive on
#[derive(Debug)]
pub struct Subscription {
    pub id: String,
    pub events: mpsc::Receiver<TicketEvent>,
}

/// 事件广播器 - 观察者注册表
///
/// Clone 共享同一个注册表。
#[derive(Debug, Clone)]
pub struct Broadcaster {
    /// 已连接的观察者 (Observer ID -> Observer)
    observers: Arc<DashMap<String, Observer>>,
    queue_capacity: usize,
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::with_queue_capacity(OBSERVER_QUEUE_CAPACITY)
    }
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcaster whose observers each buffer at most `capacity` events
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            observers: Arc::new(DashMap::new()),
            queue_capacity: capacity.max(1),
        }
    }

    /// Register a new observer
    pub fn connect(&self) -> Subscription {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.observers.insert(
            id.clone(),
            Observer {
                tx,
                rooms: HashSet::new(),
            },
        );
        tracing::info!(observer_id = %id, observers = self.observers.len(), "Observer connected");
        Subscription { id, events: rx }
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn disconnect(&self, observer_id: &str) -> bool {
        let removed = self.observers.remove(observer_id).is_some();
        if removed {
            tracing::info!(
                observer_id = %observer_id,
                observers = self.observers.len(),
                "Observer disconnected"
            );
        }
        removed
    }

    /// Returns false if the observer is not registered
    pub fn join_room(&self, observer_id: &str, room: &str) -> bool {
        match self.observers.get_mut(observer_id) {
            Some(mut observer) => {
                observer.rooms.insert(room.to_string());
                tracing::info!(observer_id = %observer_id, room = %room, "Observer joined room");
                true
            }
            None => false,
        }
    }

    /// Returns false if the observer is not registered
    pub fn leave_room(&self, observer_id: &str, room: &str) -> bool {
        match self.observers.get_mut(observer_id) {
            Some(mut observer) => {
                observer.rooms.remove(room);
                tracing::info!(observer_id = %observer_id, room = %room, "Observer left room");
                true
            }
            None => false,
        }
    }

    /// Rooms the observer is currently in
    pub fn rooms_of(&self, observer_id: &str) -> Vec<String> {
        self.observers
            .get(observer_id)
            .map(|o| o.rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Number of observers currently in `room`
    pub fn room_size(&self, room: &str) -> usize {
        self.observers
            .iter()
            .filter(|o| o.rooms.contains(room))
            .count()
    }

    /// Send to every observer. Returns how many received it.
    pub fn broadcast(&self, event: &TicketEvent) -> usize {
        self.deliver(event, |_| true)
    }

    /// Send only to observers in `room`. Returns how many received it.
    pub fn send_to_room(&self, room: &str, event: &TicketEvent) -> usize {
        self.deliver(event, |observer| observer.rooms.contains(room))
    }

    pub fn ticket_created(&self, ticket: &Ticket) -> usize {
        self.broadcast(&TicketEvent::TicketCreated(ticket.clone()))
    }

    pub fn ticket_updated(&self, ticket: &Ticket) -> usize {
        self.broadcast(&TicketEvent::TicketUpdated(ticket.clone()))
    }

    pub fn ticket_deleted(&self, id: &str) -> usize {
        self.broadcast(&TicketEvent::deleted(id))
    }

    fn deliver(&self, event: &TicketEvent, admit: impl Fn(&Observer) -> bool) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.observers.iter() {
            if !admit(entry.value()) {
                continue;
            }
            match entry.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        observer_id = %entry.key(),
                        event = %event,
                        "Observer queue full, event dropped"
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(entry.key().clone()),
            }
        }

        // Removal happens after iteration; removing while holding a shard guard deadlocks
        for id in closed {
            self.observers.remove(&id);
            tracing::debug!(observer_id = %id, "Pruned closed observer");
        }

        tracing::debug!(event = %event, delivered, "Event broadcast");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_every_observer_in_order() {
        let broadcaster = Broadcaster::new();
        let mut a = broadcaster.connect();
        let mut b = broadcaster.connect();

        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("1")), 2);
        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("2")), 2);

        for sub in [&mut a, &mut b] {
            assert_eq!(sub.events.recv().await.unwrap().ticket_id(), "1");
            assert_eq!(sub.events.recv().await.unwrap().ticket_id(), "2");
        }
    }

    #[tokio::test]
    async fn test_room_send_only_reaches_members() {
        let broadcaster = Broadcaster::new();
        let mut member = broadcaster.connect();
        let mut outsider = broadcaster.connect();

        assert!(broadcaster.join_room(&member.id, "a@b.com"));
        assert_eq!(broadcaster.room_size("a@b.com"), 1);
        assert_eq!(broadcaster.rooms_of(&member.id), vec!["a@b.com".to_string()]);

        assert_eq!(broadcaster.send_to_room("a@b.com", &TicketEvent::deleted("x")), 1);
        assert_eq!(member.events.recv().await.unwrap().ticket_id(), "x");
        assert!(outsider.events.try_recv().is_err());

        assert!(broadcaster.leave_room(&member.id, "a@b.com"));
        assert_eq!(broadcaster.send_to_room("a@b.com", &TicketEvent::deleted("y")), 0);
        assert!(!broadcaster.join_room("unknown", "a@b.com"));
    }

    #[tokio::test]
    async fn test_slow_observer_drops_overflow_without_blocking_others() {
        let broadcaster = Broadcaster::with_queue_capacity(2);
        let mut slow = broadcaster.connect();
        let mut fast = broadcaster.connect();

        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("1")), 2);
        assert_eq!(fast.events.recv().await.unwrap().ticket_id(), "1");
        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("2")), 2);
        assert_eq!(fast.events.recv().await.unwrap().ticket_id(), "2");

        // slow never drained: its queue is full, fast still receives
        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("3")), 1);
        assert_eq!(fast.events.recv().await.unwrap().ticket_id(), "3");

        // A full observer stays registered and resumes once drained
        assert_eq!(broadcaster.observer_count(), 2);
        assert_eq!(slow.events.recv().await.unwrap().ticket_id(), "1");
        assert_eq!(slow.events.recv().await.unwrap().ticket_id(), "2");
        assert!(slow.events.try_recv().is_err());

        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("4")), 2);
        assert_eq!(slow.events.recv().await.unwrap().ticket_id(), "4");
    }

    #[tokio::test]
    async fn test_closed_observers_are_pruned() {
        let broadcaster = Broadcaster::new();
        let alive = broadcaster.connect();
        let dropped = broadcaster.connect();
        drop(dropped.events);

        assert_eq!(broadcaster.observer_count(), 2);
        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("1")), 1);
        assert_eq!(broadcaster.observer_count(), 1);

        assert!(broadcaster.disconnect(&alive.id));
        assert!(!broadcaster.disconnect(&alive.id));
        assert_eq!(broadcaster.broadcast(&TicketEvent::deleted("2")), 0);
    }
}
