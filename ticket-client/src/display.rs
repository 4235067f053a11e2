//! Display helpers (pt-BR)

use shared::models::{TicketPriority, TicketStats, TicketStatus};

pub fn status_label(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "Aberto",
        TicketStatus::InProgress => "Em Progresso",
        TicketStatus::Resolved => "Resolvido",
        TicketStatus::Closed => "Fechado",
    }
}

pub fn priority_label(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => "Baixa",
        TicketPriority::Medium => "Média",
        TicketPriority::High => "Alta",
        TicketPriority::Urgent => "Urgente",
    }
}

/// Stats with every enumeration member present
///
/// The server omits values with no tickets; this view fills them with 0
/// and keeps display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub by_status: Vec<(TicketStatus, u64)>,
    pub by_priority: Vec<(TicketPriority, u64)>,
    pub total: u64,
}

impl StatsView {
    pub fn count_status(&self, status: TicketStatus) -> u64 {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }

    pub fn count_priority(&self, priority: TicketPriority) -> u64 {
        self.by_priority
            .iter()
            .find(|(p, _)| *p == priority)
            .map_or(0, |(_, n)| *n)
    }

    /// `(label, count)` rows for the status breakdown
    pub fn status_rows(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.by_status.iter().map(|(s, n)| (status_label(*s), *n))
    }

    /// `(label, count)` rows for the priority breakdown
    pub fn priority_rows(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.by_priority.iter().map(|(p, n)| (priority_label(*p), *n))
    }
}

impl From<&TicketStats> for StatsView {
    fn from(stats: &TicketStats) -> Self {
        Self {
            by_status: TicketStatus::ALL
                .into_iter()
                .map(|s| (s, stats.by_status.get(&s).copied().unwrap_or(0)))
                .collect(),
            by_priority: TicketPriority::ALL
                .into_iter()
                .map(|p| (p, stats.by_priority.get(&p).copied().unwrap_or(0)))
                .collect(),
            total: stats.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let labels: Vec<_> = TicketStatus::ALL.into_iter().map(status_label).collect();
        assert_eq!(labels, vec!["Aberto", "Em Progresso", "Resolvido", "Fechado"]);

        let labels: Vec<_> = TicketPriority::ALL.into_iter().map(priority_label).collect();
        assert_eq!(labels, vec!["Baixa", "Média", "Alta", "Urgente"]);
    }

    #[test]
    fn test_stats_view_zero_fills() {
        let mut stats = TicketStats::default();
        stats.by_status.insert(TicketStatus::Open, 3);
        stats.by_status.insert(TicketStatus::Resolved, 2);
        stats.by_priority.insert(TicketPriority::Medium, 5);
        stats.total = 5;

        let view = StatsView::from(&stats);
        assert_eq!(view.by_status.len(), 4);
        assert_eq!(view.count_status(TicketStatus::Open), 3);
        assert_eq!(view.count_status(TicketStatus::InProgress), 0);
        assert_eq!(view.count_status(TicketStatus::Closed), 0);
        assert_eq!(view.count_priority(TicketPriority::Urgent), 0);
        assert_eq!(view.total, 5);

        let rows: Vec<_> = view.status_rows().collect();
        assert_eq!(
            rows,
            vec![("Aberto", 3), ("Em Progresso", 0), ("Resolvido", 2), ("Fechado", 0)]
        );
        assert_eq!(view.priority_rows().nth(1), Some(("Média", 5)));
    }
}
