//! Sample tickets for demos and local development

use shared::models::{HistoryAction, HistoryEntry, Ticket, TicketPriority, TicketStatus, UNASSIGNED};
use shared::util::{new_ticket_id, now_millis};

use super::repository::{RepoResult, TicketRepository};

const DAY_MS: i64 = 86_400_000;

/// Insert the sample tickets if the table is empty.
///
/// Returns the number of tickets inserted.
pub async fn seed_sample_data(repo: &TicketRepository) -> RepoResult<usize> {
    let existing = repo.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Ticket table not empty, skipping sample data");
        return Ok(0);
    }

    let tickets = sample_tickets(now_millis());
    for ticket in &tickets {
        repo.insert(ticket).await?;
    }
    tracing::info!(count = tickets.len(), "Sample tickets inserted");
    Ok(tickets.len())
}

fn sample_tickets(now: i64) -> Vec<Ticket> {
    let login = Ticket {
        id: new_ticket_id(),
        title: "Problema com login".into(),
        description: "Não consigo fazer login no sistema. Aparece mensagem de erro \
                      'Credenciais inválidas' mesmo com senha correta."
            .into(),
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        requester_email: "usuario1@exemplo.com".into(),
        assigned_to: None,
        resolved_at: None,
        closed_at: None,
        created_at: now,
        updated_at: now,
        history: vec![HistoryEntry::created(now)],
    };

    let reports_created = now - DAY_MS;
    let reports = Ticket {
        id: new_ticket_id(),
        title: "Bug na tela de relatórios".into(),
        description: "A tela de relatórios não carrega os dados corretamente. \
                      Fica em loading infinito."
            .into(),
        status: TicketStatus::InProgress,
        priority: TicketPriority::High,
        requester_email: "usuario2@exemplo.com".into(),
        assigned_to: Some("João Silva".into()),
        resolved_at: None,
        closed_at: None,
        created_at: reports_created,
        updated_at: now,
        history: vec![
            HistoryEntry::created(reports_created),
            HistoryEntry::change(HistoryAction::StatusChanged, "open", "in_progress", now),
        ],
    };

    let feature_created = now - 2 * DAY_MS;
    let feature = Ticket {
        id: new_ticket_id(),
        title: "Solicitação de nova funcionalidade".into(),
        description: "Gostaria de sugerir a implementação de um filtro avançado \
                      na lista de produtos."
            .into(),
        status: TicketStatus::Resolved,
        priority: TicketPriority::Low,
        requester_email: "usuario3@exemplo.com".into(),
        assigned_to: Some("Maria Santos".into()),
        resolved_at: Some(now),
        closed_at: None,
        created_at: feature_created,
        updated_at: now,
        history: vec![
            HistoryEntry::created(feature_created),
            HistoryEntry::change(
                HistoryAction::Assigned,
                UNASSIGNED,
                "Maria Santos",
                now - DAY_MS,
            ),
            HistoryEntry::change(HistoryAction::StatusChanged, "in_progress", "resolved", now),
        ],
    };

    vec![login, reports, feature]
}
