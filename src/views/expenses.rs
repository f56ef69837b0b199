use ratatui::{layout::Constraint, style::Style, text::Span, widgets::Cell};

use super::{Listing, ViewKind};
use crate::config::AppConfig;
use crate::store::models::{Expense, Lookups};
use crate::table::Column;
use crate::ui;

impl Listing for Expense {
    const KIND: ViewKind = ViewKind::Expenses;
    const NOUN: &'static str = "expense";
    const FILTER_LABEL: &'static str = "Category";

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Reference", Constraint::Length(12)),
            Column::new("Category", Constraint::Length(13)),
            Column::new("Store", Constraint::Length(14)),
            Column::new("Date", Constraint::Length(11)),
            Column::new("Amount", Constraint::Length(11)),
            Column::new("Note", Constraint::Min(16)),
        ]
    }

    fn filter_options(lookups: &Lookups) -> Vec<String> {
        lookups.expense_categories.clone()
    }

    fn label(&self) -> String {
        self.reference.clone()
    }

    fn cells(&self, config: &AppConfig) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.reference.clone()),
            Cell::from(self.category.clone()),
            Cell::from(self.store.clone()),
            Cell::from(self.date.format("%Y-%m-%d").to_string()),
            Cell::from(config.money(self.amount)),
            Cell::from(Span::styled(self.note.clone(), Style::default().fg(ui::text_dim()))),
        ]
    }
}
