//! Update planning
//!
//! Turns a patch into the set of field writes and history entries it
//! implies for the current ticket. Pure: no I/O, the clock is a parameter.

use shared::models::{HistoryAction, HistoryEntry, Ticket, TicketStatus, TicketUpdate, UNASSIGNED};

use crate::db::repository::ticket::TicketChanges;

/// Diff `patch` against `current`
///
/// A field produces a write and one history entry only when it is present in
/// the patch and differs from the current value. Every entry shares `now`.
/// A transition into `resolved` (or `closed`) stamps `resolvedAt` (or
/// `closedAt`) with `now`; neither is ever cleared.
pub fn plan_changes(current: &Ticket, patch: &TicketUpdate, now: i64) -> TicketChanges {
    let mut changes = TicketChanges {
        timestamp: now,
        ..Default::default()
    };

    if let Some(status) = patch.status
        && status != current.status
    {
        changes.entries.push(HistoryEntry::change(
            HistoryAction::StatusChanged,
            current.status.as_str(),
            status.as_str(),
            now,
        ));
        match status {
            TicketStatus::Resolved => changes.resolved_at = Some(now),
            TicketStatus::Closed => changes.closed_at = Some(now),
            TicketStatus::Open | TicketStatus::InProgress => {}
        }
        changes.status = Some(status);
    }

    if let Some(priority) = patch.priority
        && priority != current.priority
    {
        changes.entries.push(HistoryEntry::change(
            HistoryAction::PriorityChanged,
            current.priority.as_str(),
            priority.as_str(),
            now,
        ));
        changes.priority = Some(priority);
    }

    if let Some(assignee) = &patch.assigned_to
        && current.assigned_to.as_ref() != Some(assignee)
    {
        changes.entries.push(HistoryEntry::change(
            HistoryAction::Assigned,
            current.assigned_to.as_deref().unwrap_or(UNASSIGNED),
            assignee.as_str(),
            now,
        ));
        changes.assigned_to = Some(assignee.clone());
    }

    changes
}
