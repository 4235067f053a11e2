//! Ticket Repository

use super::{BaseRepository, RepoError, RepoResult};
use serde::Deserialize;
use shared::models::{
    HistoryEntry, Ticket, TicketFilter, TicketPriority, TicketStats, TicketStatus,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

/// Projection that maps a stored document back onto [`Ticket`]
const FIELDS: &str = "record::id(id) AS id, title, description, status, priority, \
    requesterEmail, assignedTo, resolvedAt, closedAt, createdAt, updatedAt, history";

/// Field writes produced by one update call
///
/// Only the `Some` fields are written; `entries` are appended to `history`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_to: Option<String>,
    pub resolved_at: Option<i64>,
    pub closed_at: Option<i64>,
    pub entries: Vec<HistoryEntry>,
    /// Timestamp shared by every entry and by `updatedAt`
    pub timestamp: i64,
}

impl TicketChanges {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stored document: the ticket without its id, which lives in the record key
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketDocument {
    title: String,
    description: String,
    status: TicketStatus,
    priority: TicketPriority,
    requester_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    closed_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
    history: Vec<HistoryEntry>,
}

impl From<&Ticket> for TicketDocument {
    fn from(t: &Ticket) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
            status: t.status,
            priority: t.priority,
            requester_email: t.requester_email.clone(),
            assigned_to: t.assigned_to.clone(),
            resolved_at: t.resolved_at,
            closed_at: t.closed_at,
            created_at: t.created_at,
            updated_at: t.updated_at,
            history: t.history.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusCount {
    status: TicketStatus,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct PriorityCount {
    priority: TicketPriority,
    count: u64,
}

/// Row returned by `DELETE ... RETURN BEFORE`; only its presence matters
#[derive(Debug, Deserialize)]
struct Removed {}

#[derive(Debug, Deserialize)]
struct Total {
    total: u64,
}

#[derive(Clone, Debug)]
pub struct TicketRepository {
    base: BaseRepository,
}

impl TicketRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a fully built ticket under its own id
    pub async fn insert(&self, ticket: &Ticket) -> RepoResult<()> {
        self.base
            .db()
            .query("CREATE type::thing('ticket', $id) CONTENT $doc RETURN NONE")
            .bind(("id", ticket.id.clone()))
            .bind(("doc", TicketDocument::from(ticket)))
            .await?
            .check()?;
        Ok(())
    }

    /// Find tickets matching the filter, newest first
    pub async fn find_all(&self, filter: &TicketFilter) -> RepoResult<Vec<Ticket>> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.priority.is_some() {
            conditions.push("priority = $priority");
        }
        let requester = filter.requester_term();
        if requester.is_some() {
            conditions.push("requesterEmail = $requesterEmail");
        }
        let assignee = filter.assignee_term();
        if assignee.is_some() {
            conditions.push("assignedTo = $assignedTo");
        }
        let search = filter.search_term().map(str::to_lowercase);
        if search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(title), $search) \
                 OR string::contains(string::lowercase(description), $search))",
            );
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT {FIELDS} FROM ticket{where_clause} ORDER BY createdAt DESC");

        let mut query = self.base.db().query(sql);
        if let Some(status) = filter.status {
            query = query.bind(("status", status.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.bind(("priority", priority.as_str()));
        }
        if let Some(email) = requester {
            query = query.bind(("requesterEmail", email.to_string()));
        }
        if let Some(assignee) = assignee {
            query = query.bind(("assignedTo", assignee.to_string()));
        }
        if let Some(search) = search {
            query = query.bind(("search", search));
        }

        let tickets: Vec<Ticket> = query.await?.take(0)?;
        Ok(tickets)
    }

    /// Find ticket by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Ticket>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM type::thing('ticket', $id)"))
            .bind(("id", id.to_string()))
            .await?;
        let tickets: Vec<Ticket> = result.take(0)?;
        Ok(tickets.into_iter().next())
    }

    /// Write the changed fields and append history entries in one statement
    ///
    /// Returns the ticket as stored afterwards.
    pub async fn apply_changes(&self, id: &str, changes: &TicketChanges) -> RepoResult<Ticket> {
        let mut assignments = vec![
            "history = array::concat(history, $entries)",
            "updatedAt = $now",
        ];
        if changes.status.is_some() {
            assignments.push("status = $status");
        }
        if changes.priority.is_some() {
            assignments.push("priority = $priority");
        }
        if changes.assigned_to.is_some() {
            assignments.push("assignedTo = $assignedTo");
        }
        if changes.resolved_at.is_some() {
            assignments.push("resolvedAt = $resolvedAt");
        }
        if changes.closed_at.is_some() {
            assignments.push("closedAt = $closedAt");
        }

        let sql = format!(
            "UPDATE type::thing('ticket', $id) SET {} RETURN NONE; \
             SELECT {FIELDS} FROM type::thing('ticket', $id);",
            assignments.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("id", id.to_string()))
            .bind(("entries", changes.entries.clone()))
            .bind(("now", changes.timestamp));
        if let Some(status) = changes.status {
            query = query.bind(("status", status.as_str()));
        }
        if let Some(priority) = changes.priority {
            query = query.bind(("priority", priority.as_str()));
        }
        if let Some(assignee) = &changes.assigned_to {
            query = query.bind(("assignedTo", assignee.clone()));
        }
        if let Some(resolved_at) = changes.resolved_at {
            query = query.bind(("resolvedAt", resolved_at));
        }
        if let Some(closed_at) = changes.closed_at {
            query = query.bind(("closedAt", closed_at));
        }

        let mut result = query.await?.check()?;
        let tickets: Vec<Ticket> = result.take(1)?;
        tickets
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    /// Hard delete a ticket. Returns false if nothing was deleted.
    ///
    /// The existence check and the removal are one statement, so of two
    /// concurrent deletes of the same id exactly one reports true.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        match self.delete_once(id).await {
            // The losing side of a write conflict retries and finds nothing left
            Err(RepoError::Database(msg)) if msg.to_lowercase().contains("conflict") => {
                tracing::debug!(ticket_id = %id, error = %msg, "Delete conflicted, retrying");
                self.delete_once(id).await
            }
            other => other,
        }
    }

    async fn delete_once(&self, id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE type::thing('ticket', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        let removed: Vec<Removed> = result.take(0)?;
        Ok(!removed.is_empty())
    }

    /// Number of stored tickets
    pub async fn count(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM ticket GROUP ALL")
            .await?;
        let rows: Vec<Total> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Counts per status, per priority and in total
    ///
    /// Three statements, not a snapshot: a concurrent write can make the
    /// parts disagree.
    pub async fn stats(&self) -> RepoResult<TicketStats> {
        let mut result = self
            .base
            .db()
            .query("SELECT status, count() AS count FROM ticket GROUP BY status")
            .query("SELECT priority, count() AS count FROM ticket GROUP BY priority")
            .query("SELECT count() AS total FROM ticket GROUP ALL")
            .await?;

        let by_status: Vec<StatusCount> = result.take(0)?;
        let by_priority: Vec<PriorityCount> = result.take(1)?;
        let total: Vec<Total> = result.take(2)?;

        Ok(TicketStats {
            by_status: by_status.into_iter().map(|r| (r.status, r.count)).collect(),
            by_priority: by_priority
                .into_iter()
                .map(|r| (r.priority, r.count))
                .collect(),
            total: total.first().map(|r| r.total).unwrap_or(0),
        })
    }
}
