//! Ticket Service
//!
//! Validation, history derivation and change notification on top of
//! [`TicketRepository`]. Notifications go out only after the write succeeded.

use shared::models::{
    HistoryEntry, Ticket, TicketCreate, TicketFilter, TicketStats, TicketStatus, TicketUpdate,
};
use shared::util::{new_ticket_id, now_millis};

use super::changes::plan_changes;
use crate::db::repository::TicketRepository;
use crate::message::Broadcaster;
use crate::utils::validation::{validate_ticket_create, validate_ticket_update};
use crate::utils::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct TicketService {
    repo: TicketRepository,
    broadcaster: Broadcaster,
}

impl TicketService {
    pub fn new(repo: TicketRepository, broadcaster: Broadcaster) -> Self {
        Self { repo, broadcaster }
    }

    pub fn repository(&self) -> &TicketRepository {
        &self.repo
    }

    /// Create an open ticket with its `created` history entry
    pub async fn create(&self, input: TicketCreate) -> AppResult<Ticket> {
        let input = validate_ticket_create(input)?;
        let now = now_millis();

        let ticket = Ticket {
            id: new_ticket_id(),
            title: input.title,
            description: input.description,
            status: TicketStatus::Open,
            priority: input.priority.unwrap_or_default(),
            requester_email: input.requester_email,
            assigned_to: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
            history: vec![HistoryEntry::created(now)],
        };

        self.repo.insert(&ticket).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            requester = %ticket.requester_email,
            priority = %ticket.priority,
            "Ticket created"
        );

        self.broadcaster.ticket_created(&ticket);
        Ok(ticket)
    }

    /// Tickets matching the filter, newest first
    pub async fn list(&self, filter: &TicketFilter) -> AppResult<Vec<Ticket>> {
        Ok(self.repo.find_all(filter).await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<Ticket> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ticket_not_found(id))
    }

    pub async fn list_by_requester(&self, email: &str) -> AppResult<Vec<Ticket>> {
        self.list(&TicketFilter::requester(email.trim())).await
    }

    /// Apply a patch, appending one history entry per changed field
    ///
    /// A patch that changes nothing issues no write; the current ticket is
    /// still returned and notified.
    pub async fn update(&self, id: &str, patch: TicketUpdate) -> AppResult<Ticket> {
        let patch = validate_ticket_update(patch)?;
        let current = self.get(id).await?;

        let changes = plan_changes(&current, &patch, now_millis());
        let ticket = if changes.is_empty() {
            tracing::debug!(ticket_id = %id, "Update changed nothing");
            current
        } else {
            let updated = self.repo.apply_changes(id, &changes).await?;
            tracing::info!(
                ticket_id = %id,
                entries = changes.entries.len(),
                status = %updated.status,
                "Ticket updated"
            );
            updated
        };

        self.broadcaster.ticket_updated(&ticket);
        Ok(ticket)
    }

    pub async fn remove(&self, id: &str) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ticket_not_found(id));
        }
        tracing::info!(ticket_id = %id, "Ticket deleted");

        self.broadcaster.ticket_deleted(id);
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<TicketStats> {
        Ok(self.repo.stats().await?)
    }
}
