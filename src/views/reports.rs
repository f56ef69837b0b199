//! Sales report: one row per invoice with its payment state

use ratatui::{layout::Constraint, style::Style, text::Span, widgets::Cell};

use super::{Listing, ViewKind};
use crate::config::AppConfig;
use crate::store::models::{Lookups, SaleReport};
use crate::table::Column;
use crate::ui;

impl Listing for SaleReport {
    const KIND: ViewKind = ViewKind::Reports;
    const NOUN: &'static str = "sale";
    const FILTER_LABEL: &'static str = "Store";

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Invoice", Constraint::Length(10)),
            Column::new("Date", Constraint::Length(11)),
            Column::new("Customer", Constraint::Min(16)),
            Column::new("Store", Constraint::Length(14)),
            Column::new("Items", Constraint::Length(6)),
            Column::new("Total", Constraint::Length(11)),
            Column::new("Paid", Constraint::Length(11)),
            Column::new("Payment", Constraint::Length(8)),
        ]
    }

    fn filter_options(lookups: &Lookups) -> Vec<String> {
        lookups.stores.clone()
    }

    fn label(&self) -> String {
        self.invoice.clone()
    }

    fn cells(&self, config: &AppConfig) -> Vec<Cell<'static>> {
        let status = self.payment_status();
        let color = match status {
            "Paid" => ui::success(),
            "Partial" => ui::warning(),
            _ => ui::danger(),
        };

        vec![
            Cell::from(self.invoice.clone()),
            Cell::from(self.date.format("%Y-%m-%d").to_string()),
            Cell::from(self.customer.clone()),
            Cell::from(self.store.clone()),
            Cell::from(self.items.to_string()),
            Cell::from(config.money(self.total)),
            Cell::from(config.money(self.paid)),
            Cell::from(Span::styled(status, Style::default().fg(color))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock;

    #[test]
    fn test_one_cell_per_column() {
        for sale in mock::sales().iter().take(8) {
            assert_eq!(sale.cells(&AppConfig::default()).len(), SaleReport::columns().len());
        }
    }
}
