use ratatui::{
    layout::Constraint,
    style::Style,
    text::Span,
    widgets::Cell,
};

use super::{Listing, ViewKind};
use crate::barcode::LabelRequest;
use crate::config::AppConfig;
use crate::store::models::{Lookups, Product};
use crate::table::Column;
use crate::ui;

impl Listing for Product {
    const KIND: ViewKind = ViewKind::Products;
    const NOUN: &'static str = "product";
    const FILTER_LABEL: &'static str = "Category";
    const PRINTS_LABELS: bool = true;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Name", Constraint::Min(20)),
            Column::new("SKU", Constraint::Length(10)),
            Column::new("Category", Constraint::Length(14)),
            Column::new("Brand", Constraint::Length(12)),
            Column::new("Price", Constraint::Length(10)),
            Column::new("Stock", Constraint::Length(8)),
        ]
    }

    fn filter_options(lookups: &Lookups) -> Vec<String> {
        lookups.categories.clone()
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn cells(&self, config: &AppConfig) -> Vec<Cell<'static>> {
        let stock_color = if self.stock == 0 {
            ui::danger()
        } else if self.is_low_stock() {
            ui::warning()
        } else {
            ui::text()
        };

        vec![
            Cell::from(self.name.clone()),
            Cell::from(Span::styled(self.sku.clone(), Style::default().fg(ui::text_dim()))),
            Cell::from(self.category.clone()),
            Cell::from(self.brand.clone()),
            Cell::from(config.money(self.price)),
            Cell::from(Span::styled(
                format!("{} {}", self.stock, self.unit),
                Style::default().fg(stock_color),
            )),
        ]
    }

    fn label_request(&self) -> Option<LabelRequest> {
        Some(LabelRequest {
            name: self.name.clone(),
            sku: self.sku.clone(),
            price: self.price,
            quantity: 1,
        })
    }
}
