use ratatui::{
    layout::Constraint,
    style::Style,
    text::Span,
    widgets::Cell,
};

use super::{Listing, ViewKind};
use crate::config::AppConfig;
use crate::store::models::{Lookups, Purchase, PurchaseStatus};
use crate::table::Column;
use crate::ui;

const STATUSES: [PurchaseStatus; 3] = [
    PurchaseStatus::Ordered,
    PurchaseStatus::Pending,
    PurchaseStatus::Received,
];

impl Listing for Purchase {
    const KIND: ViewKind = ViewKind::Purchases;
    const NOUN: &'static str = "purchase";
    const FILTER_LABEL: &'static str = "Status";

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Reference", Constraint::Length(12)),
            Column::new("Supplier", Constraint::Min(18)),
            Column::new("Store", Constraint::Length(14)),
            Column::new("Date", Constraint::Length(11)),
            Column::new("Status", Constraint::Length(10)),
            Column::new("Total", Constraint::Length(11)),
            Column::new("Due", Constraint::Length(11)),
        ]
    }

    fn filter_options(_lookups: &Lookups) -> Vec<String> {
        STATUSES.iter().map(|s| s.as_str().to_string()).collect()
    }

    fn label(&self) -> String {
        self.reference.clone()
    }

    fn cells(&self, config: &AppConfig) -> Vec<Cell<'static>> {
        let status_color = match self.status {
            PurchaseStatus::Received => ui::success(),
            PurchaseStatus::Pending => ui::warning(),
            PurchaseStatus::Ordered => ui::accent(),
        };
        let due = self.due();
        let due_color = if due > 0.0 { ui::danger() } else { ui::text_dim() };

        vec![
            Cell::from(self.reference.clone()),
            Cell::from(self.supplier.clone()),
            Cell::from(self.store.clone()),
            Cell::from(self.date.format("%Y-%m-%d").to_string()),
            Cell::from(Span::styled(self.status.as_str(), Style::default().fg(status_color))),
            Cell::from(config.money(self.total)),
            Cell::from(Span::styled(config.money(due), Style::default().fg(due_color))),
        ]
    }
}
