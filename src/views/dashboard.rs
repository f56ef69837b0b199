//! Dashboard: totals, monthly sales chart and the products running low

use chrono::Datelike;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{BarChart, Block, Borders, Cell},
    Frame,
};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{Screen, ScreenEvent, ViewKind};
use crate::config::AppConfig;
use crate::store::models::{Expense, Product, Purchase, SaleReport};
use crate::store::Resources;
use crate::table::{Column, TableComponent};
use crate::ui::{self, components};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub sales: f64,
    pub purchases: f64,
    pub expenses: f64,
    /// Sales minus purchases and expenses
    pub net: f64,
    pub invoices: usize,
    pub monthly_sales: Vec<(&'static str, u64)>,
    /// Lowest stock first
    pub low_stock: Vec<Product>,
}

pub fn summarize(
    products: &[Product],
    purchases: &[Purchase],
    expenses: &[Expense],
    sales: &[SaleReport],
) -> Summary {
    let sales_total: f64 = sales.iter().map(|s| s.total).sum();
    let purchases_total: f64 = purchases.iter().map(|p| p.total).sum();
    let expenses_total: f64 = expenses.iter().map(|e| e.amount).sum();

    let mut per_month = [0.0f64; 12];
    for sale in sales {
        per_month[sale.date.month0() as usize] += sale.total;
    }

    let mut low_stock: Vec<Product> = products.iter().filter(|p| p.is_low_stock()).cloned().collect();
    low_stock.sort_by_key(|p| p.stock);

    Summary {
        sales: sales_total,
        purchases: purchases_total,
        expenses: expenses_total,
        net: sales_total - purchases_total - expenses_total,
        invoices: sales.len(),
        monthly_sales: MONTHS
            .iter()
            .zip(per_month)
            .map(|(month, total)| (*month, total.round() as u64))
            .collect(),
        low_stock,
    }
}

pub async fn load_summary(resources: &Resources) -> Summary {
    let (products, purchases, expenses, sales) = tokio::join!(
        resources.products.all(),
        resources.purchases.all(),
        resources.expenses.all(),
        resources.sales.all(),
    );
    summarize(&products, &purchases, &expenses, &sales)
}

pub struct DashboardView {
    resources: Resources,
    config: AppConfig,
    summary: Option<Summary>,
    loading: bool,
    low_stock: TableComponent<Product>,
    tx: UnboundedSender<Summary>,
    rx: UnboundedReceiver<Summary>,
}

impl DashboardView {
    pub fn new(resources: Resources, config: &AppConfig) -> Self {
        let columns = vec![
            Column::new("Product", Constraint::Min(20)),
            Column::new("SKU", Constraint::Length(10)),
            Column::new("Stock", Constraint::Length(7)),
            Column::new("Alert at", Constraint::Length(9)),
        ];
        let low_stock = TableComponent::new(columns, |p: &Product| p.id.clone())
            .skeleton_rows(config.skeleton_rows);
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            resources,
            config: config.clone(),
            summary: None,
            loading: false,
            low_stock,
            tx,
            rx,
        }
    }

    #[cfg(test)]
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    fn refresh(&mut self) {
        self.loading = true;
        let resources = self.resources.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(load_summary(&resources).await);
        });
    }

    fn low_stock_rows(&self) -> &[Product] {
        self.summary.as_ref().map(|s| s.low_stock.as_slice()).unwrap_or_default()
    }

    fn draw_cards(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let value = |amount: Option<f64>| match amount {
            Some(amount) if !self.loading => self.config.money(amount),
            _ => "--".to_string(),
        };
        let summary = self.summary.as_ref();
        let net = summary.map(|s| s.net);
        let net_color = if net.unwrap_or(0.0) < 0.0 { ui::danger() } else { ui::success() };

        components::draw_card(f, chunks[0], "Sales", &value(summary.map(|s| s.sales)), ui::accent());
        components::draw_card(f, chunks[1], "Purchases", &value(summary.map(|s| s.purchases)), ui::text());
        components::draw_card(f, chunks[2], "Expenses", &value(summary.map(|s| s.expenses)), ui::warning());
        components::draw_card(f, chunks[3], "Net", &value(net), net_color);
    }

    fn draw_chart(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" Sales by month ", Style::default().fg(ui::header())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui::inactive()));

        let data: &[(&str, u64)] = match &self.summary {
            Some(summary) if !self.loading => &summary.monthly_sales,
            _ => &[],
        };

        let chart = BarChart::default()
            .block(block)
            .data(data)
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(ui::accent()))
            .value_style(Style::default().fg(ui::accent()).add_modifier(Modifier::REVERSED))
            .label_style(Style::default().fg(ui::text_dim()));
        f.render_widget(chart, area);
    }
}

impl Screen for DashboardView {
    fn kind(&self) -> ViewKind {
        ViewKind::Dashboard
    }

    fn activate(&mut self) {
        self.refresh();
    }

    fn tick(&mut self) -> Vec<ScreenEvent> {
        while let Ok(summary) = self.rx.try_recv() {
            self.loading = false;
            self.low_stock.reconcile(&summary.low_stock);
            self.summary = Some(summary);
        }
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> ScreenEvent {
        let len = self.low_stock_rows().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.low_stock.move_down(len),
            KeyCode::Char('k') | KeyCode::Up => self.low_stock.move_up(len),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
        ScreenEvent::None
    }

    fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Percentage(50),
                Constraint::Min(5),
            ])
            .split(area);

        self.draw_cards(f, chunks[0]);
        self.draw_chart(f, chunks[1]);

        let block = Block::default()
            .title(Span::styled(" Low stock ", Style::default().fg(ui::warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui::inactive()));
        self.low_stock.render(
            f,
            chunks[2],
            self.low_stock_rows(),
            self.loading,
            block,
            true,
            |product, _, _, _| {
                let color = if product.stock == 0 { ui::danger() } else { ui::warning() };
                vec![
                    Cell::from(product.name.as_str()),
                    Cell::from(product.sku.as_str()),
                    Cell::from(Span::styled(product.stock.to_string(), Style::default().fg(color))),
                    Cell::from(product.alert_quantity.to_string()),
                ]
            },
        );
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("↑↓", "Nav"), ("r", "Reload")]
    }

    fn apply_config(&mut self, config: &AppConfig) {
        self.low_stock.set_skeleton_rows(config.skeleton_rows);
        self.config = config.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock;
    use std::time::Duration;

    fn mock_summary() -> Summary {
        summarize(&mock::products(), &mock::purchases(), &mock::expenses(), &mock::sales())
    }

    #[test]
    fn test_net_is_sales_minus_costs() {
        let summary = mock_summary();
        let expected = summary.sales - summary.purchases - summary.expenses;
        assert!((summary.net - expected).abs() < 1e-9);
        assert_eq!(summary.invoices, mock::sales().len());
    }

    #[test]
    fn test_monthly_sales_cover_the_year() {
        let summary = mock_summary();
        assert_eq!(summary.monthly_sales.len(), 12);
        assert_eq!(summary.monthly_sales[0].0, "Jan");

        let charted: u64 = summary.monthly_sales.iter().map(|(_, v)| v).sum();
        assert!((charted as f64 - summary.sales).abs() <= 12.0);
    }

    #[test]
    fn test_low_stock_sorted_ascending() {
        let summary = mock_summary();
        let expected = mock::products().iter().filter(|p| p.is_low_stock()).count();

        assert_eq!(summary.low_stock.len(), expected);
        assert!(summary.low_stock.windows(2).all(|w| w[0].stock <= w[1].stock));
        assert_eq!(summary.low_stock[0].stock, 0);
    }

    #[test]
    fn test_empty_store() {
        let summary = summarize(&[], &[], &[], &[]);
        assert_eq!(summary.net, 0.0);
        assert!(summary.monthly_sales.iter().all(|(_, v)| *v == 0));
        assert!(summary.low_stock.is_empty());
    }

    #[tokio::test]
    async fn test_activate_loads_summary() {
        let mut view = DashboardView::new(mock::seed(Duration::ZERO), &AppConfig::default());
        view.activate();

        for _ in 0..200 {
            tokio::time::sleep(Duration::from_millis(1)).await;
            view.tick();
            if view.summary().is_some() {
                break;
            }
        }

        assert!(view.summary().is_some());
        assert!(!view.loading);
    }
}
