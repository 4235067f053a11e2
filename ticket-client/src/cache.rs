//! 客户端工单缓存
//!
//! 保存最近一次已知的工单列表，作为可观察状态。只通过下列规则变更，
//! 从不访问服务器：
//!
//! | 输入 | 效果 |
//! |------|------|
//! | 列表加载 | 整体替换 |
//! | ticketCreated | 视图接受时插入到最前；id 已存在则原地替换 |
//! | ticketUpdated | 原地替换同 id 条目；不存在则忽略 |
//! | ticketDeleted | 移除同 id 条目 |
//!
//! 订阅者在每次实际变更后收到完整的当前状态。

use shared::message::TicketEvent;
use shared::models::Ticket;
use tokio::sync::watch;

/// Which tickets a cache admits from `ticketCreated`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheView {
    /// Admin view: every ticket
    All,
    /// Requester view: only tickets opened by this email
    Requester(String),
}

impl CacheView {
    pub fn requester(email: impl Into<String>) -> Self {
        Self::Requester(email.into().trim().to_string())
    }

    /// Requester emails compare exactly, as the server's by-email listing does
    pub fn admits(&self, ticket: &Ticket) -> bool {
        match self {
            Self::All => true,
            Self::Requester(email) => ticket.requester_email == *email,
        }
    }
}

/// Observable cache state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheState {
    pub view: CacheView,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug)]
pub struct TicketCache {
    state: watch::Sender<CacheState>,
}

impl TicketCache {
    pub fn new(view: CacheView) -> Self {
        let (state, _) = watch::channel(CacheState {
            view,
            tickets: Vec::new(),
        });
        Self { state }
    }

    /// Cache for the admin dashboard
    pub fn admin() -> Self {
        Self::new(CacheView::All)
    }

    /// Cache for a requester's "my tickets" page
    pub fn requester(email: impl Into<String>) -> Self {
        Self::new(CacheView::requester(email))
    }

    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.state.subscribe()
    }

    pub fn view(&self) -> CacheView {
        self.state.borrow().view.clone()
    }

    /// Switch view. A different view clears the list until the next load.
    pub fn set_view(&self, view: CacheView) -> bool {
        self.state.send_if_modified(|state| {
            if state.view == view {
                return false;
            }
            state.view = view;
            state.tickets.clear();
            true
        })
    }

    /// Snapshot of the current list
    pub fn tickets(&self) -> Vec<Ticket> {
        self.state.borrow().tickets.clone()
    }

    pub fn get(&self, id: &str) -> Option<Ticket> {
        self.state.borrow().tickets.iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh list load
    pub fn replace_all(&self, tickets: Vec<Ticket>) {
        self.state.send_modify(|state| state.tickets = tickets);
    }

    /// Apply a real-time event. Returns true when the list changed.
    pub fn apply(&self, event: &TicketEvent) -> bool {
        let changed = self.state.send_if_modified(|state| match event {
            TicketEvent::TicketCreated(ticket) => {
                if !state.view.admits(ticket) {
                    return false;
                }
                match state.tickets.iter_mut().find(|t| t.id == ticket.id) {
                    Some(existing) => {
                        if existing == ticket {
                            return false;
                        }
                        *existing = ticket.clone();
                    }
                    None => state.tickets.insert(0, ticket.clone()),
                }
                true
            }
            TicketEvent::TicketUpdated(ticket) => {
                match state.tickets.iter_mut().find(|t| t.id == ticket.id) {
                    Some(existing) if existing != ticket => {
                        *existing = ticket.clone();
                        true
                    }
                    _ => false,
                }
            }
            TicketEvent::TicketDeleted(deleted) => {
                let before = state.tickets.len();
                state.tickets.retain(|t| t.id != deleted.id);
                state.tickets.len() != before
            }
        });

        tracing::trace!(event = %event, changed, "Cache event applied");
        changed
    }
}

impl Default for TicketCache {
    fn default() -> Self {
        Self::admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{HistoryEntry, TicketPriority, TicketStatus};

    fn ticket(id: &str, email: &str) -> Ticket {
        Ticket {
            id: id.into(),
            title: format!("Ticket {id}"),
            description: "details".into(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            requester_email: email.into(),
            assigned_to: None,
            resolved_at: None,
            closed_at: None,
            created_at: 1,
            updated_at: 1,
            history: vec![HistoryEntry::created(1)],
        }
    }

    fn ids(cache: &TicketCache) -> Vec<String> {
        cache.tickets().into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_created_prepends() {
        let cache = TicketCache::admin();
        cache.replace_all(vec![ticket("1", "a@b.com")]);

        assert!(cache.apply(&TicketEvent::TicketCreated(ticket("2", "c@d.com"))));
        assert_eq!(ids(&cache), vec!["2", "1"]);
    }

    #[test]
    fn test_duplicate_create_replaces_in_place() {
        let cache = TicketCache::admin();
        cache.replace_all(vec![ticket("2", "a@b.com"), ticket("1", "a@b.com")]);

        let mut changed = ticket("1", "a@b.com");
        changed.title = "Renamed".into();
        assert!(cache.apply(&TicketEvent::TicketCreated(changed)));
        assert_eq!(ids(&cache), vec!["2", "1"]);
        assert_eq!(cache.get("1").unwrap().title, "Renamed");

        // Identical payload is not a mutation
        assert!(!cache.apply(&TicketEvent::TicketCreated(ticket("2", "a@b.com"))));
    }

    #[test]
    fn test_requester_view_admits_own_tickets_only() {
        let cache = TicketCache::requester(" a@b.com ");
        assert!(cache.apply(&TicketEvent::TicketCreated(ticket("1", "a@b.com"))));
        assert!(!cache.apply(&TicketEvent::TicketCreated(ticket("2", "x@y.com"))));
        assert_eq!(ids(&cache), vec!["1"]);
    }

    #[test]
    fn test_requester_view_is_case_sensitive() {
        let cache = TicketCache::requester("A@B.com");
        assert!(!cache.apply(&TicketEvent::TicketCreated(ticket("1", "a@b.com"))));
        assert!(cache.apply(&TicketEvent::TicketCreated(ticket("2", "A@B.com"))));
        assert_eq!(ids(&cache), vec!["2"]);
    }

    #[test]
    fn test_update_replaces_in_place_or_is_ignored() {
        let cache = TicketCache::admin();
        cache.replace_all(vec![ticket("2", "a@b.com"), ticket("1", "a@b.com")]);

        let mut resolved = ticket("1", "a@b.com");
        resolved.status = TicketStatus::Resolved;
        assert!(cache.apply(&TicketEvent::TicketUpdated(resolved)));
        assert_eq!(ids(&cache), vec!["2", "1"]);
        assert_eq!(cache.get("1").unwrap().status, TicketStatus::Resolved);

        assert!(!cache.apply(&TicketEvent::TicketUpdated(ticket("9", "a@b.com"))));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_delete_removes_if_present() {
        let cache = TicketCache::admin();
        cache.replace_all(vec![ticket("1", "a@b.com")]);

        assert!(!cache.apply(&TicketEvent::deleted("9")));
        assert!(cache.apply(&TicketEvent::deleted("1")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_view_clears_list() {
        let cache = TicketCache::requester("a@b.com");
        cache.replace_all(vec![ticket("1", "a@b.com")]);

        assert!(!cache.set_view(CacheView::requester("a@b.com")));
        assert_eq!(cache.len(), 1);

        assert!(cache.set_view(CacheView::requester("c@d.com")));
        assert!(cache.is_empty());
        assert_eq!(cache.view(), CacheView::Requester("c@d.com".into()));
    }

    #[tokio::test]
    async fn test_subscribers_see_effective_mutations_only() {
        let cache = TicketCache::admin();
        let mut rx = cache.subscribe();

        cache.apply(&TicketEvent::deleted("missing"));
        assert!(!rx.has_changed().unwrap());

        cache.apply(&TicketEvent::TicketCreated(ticket("1", "a@b.com")));
        assert!(rx.has_changed().unwrap());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().tickets.len(), 1);
    }
}
