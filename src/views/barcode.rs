//! Barcode label modal: pick quantities and paper, then print through the browser

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::barcode::print::render_print_document;
use crate::barcode::{expand_labels, BarcodeError, Code128, LabelRequest, PaperSize};
use crate::config::AppConfig;
use crate::ui;

const MAX_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq)]
pub enum BarcodeAction {
    None,
    Close,
    /// Complete print document, ready to open
    Print { html: String, labels: usize },
    Status(String),
}

pub struct BarcodeModal {
    requests: Vec<LabelRequest>,
    cursor: usize,
    paper: PaperSize,
    title: String,
    currency: String,
}

impl BarcodeModal {
    pub fn new(requests: Vec<LabelRequest>, config: &AppConfig) -> Self {
        Self {
            requests,
            cursor: 0,
            paper: config.paper_size,
            title: format!("{} labels", config.store_name),
            currency: config.currency.clone(),
        }
    }

    #[cfg(test)]
    pub fn requests(&self) -> &[LabelRequest] {
        &self.requests
    }

    #[cfg(test)]
    pub fn paper(&self) -> PaperSize {
        self.paper
    }

    pub fn label_count(&self) -> u32 {
        self.requests.iter().map(|r| r.quantity).sum()
    }

    pub fn document(&self) -> Result<String, BarcodeError> {
        let labels = expand_labels(&self.requests)?;
        render_print_document(&labels, self.paper, &self.title, &self.currency)
    }

    fn adjust(&mut self, delta: i64) {
        if let Some(request) = self.requests.get_mut(self.cursor) {
            let quantity = (i64::from(request.quantity) + delta).clamp(0, i64::from(MAX_QUANTITY));
            request.quantity = quantity as u32;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> BarcodeAction {
        let len = self.requests.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return BarcodeAction::Close,
            KeyCode::Char('j') | KeyCode::Down if len > 0 => self.cursor = (self.cursor + 1) % len,
            KeyCode::Char('k') | KeyCode::Up if len > 0 => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1)
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => self.adjust(1),
            KeyCode::Char('-') | KeyCode::Left => self.adjust(-1),
            KeyCode::Char('p') => self.paper = self.paper.next(),
            KeyCode::Enter => {
                return match self.document() {
                    Ok(html) => BarcodeAction::Print {
                        html,
                        labels: self.label_count() as usize,
                    },
                    Err(e) => BarcodeAction::Status(format!("Cannot print: {}", e)),
                };
            }
            _ => {}
        }
        BarcodeAction::None
    }

    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let popup_area = ui::centered_rect(
            if area.width < 100 { 95 } else { 75 },
            if area.height < 30 { 90 } else { 70 },
            area,
        );
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(Span::styled(
                format!(" Print labels │ {} │ {} labels ", self.paper, self.label_count()),
                Style::default().fg(ui::accent()).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui::accent()));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Products
                Constraint::Length(4), // Preview
                Constraint::Length(1), // Keys
            ])
            .split(inner);

        let header = Row::new(["Product", "SKU", "Price", "Qty"].map(|title| {
            Cell::from(Span::styled(title, Style::default().fg(ui::header()).add_modifier(Modifier::BOLD)))
        }));
        let rows = self.requests.iter().map(|request| {
            let qty_color = if request.quantity == 0 { ui::inactive() } else { ui::text() };
            Row::new(vec![
                Cell::from(request.name.as_str()),
                Cell::from(Span::styled(request.sku.as_str(), Style::default().fg(ui::text_dim()))),
                Cell::from(format!("{}{:.2}", self.currency, request.price)),
                Cell::from(Span::styled(
                    format!("◀ {:>3} ▶", request.quantity),
                    Style::default().fg(qty_color),
                )),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().bg(crate::theme::current().bg_selected));
        let mut state = TableState::default();
        state.select(Some(self.cursor));
        f.render_stateful_widget(table, chunks[0], &mut state);

        let preview = match self.requests.get(self.cursor).map(|r| Code128::encode(&r.sku)) {
            Some(Ok(code)) => vec![
                Line::from(Span::styled(code.to_text(), Style::default().fg(ui::text()))),
                Line::from(Span::styled(code.to_text(), Style::default().fg(ui::text()))),
                Line::from(Span::styled(code.text().to_string(), Style::default().fg(ui::text_dim()))),
            ],
            Some(Err(e)) => vec![Line::from(Span::styled(e.to_string(), Style::default().fg(ui::danger())))],
            None => vec![Line::from("")],
        };
        f.render_widget(Paragraph::new(preview).alignment(ratatui::layout::Alignment::Center), chunks[1]);

        let keys = Line::from(vec![
            Span::styled("+/-", Style::default().fg(ui::accent())),
            Span::styled(" Qty │ ", Style::default().fg(ui::text_dim())),
            Span::styled("p", Style::default().fg(ui::accent())),
            Span::styled(" Paper │ ", Style::default().fg(ui::text_dim())),
            Span::styled("Enter", Style::default().fg(ui::accent())),
            Span::styled(" Print │ ", Style::default().fg(ui::text_dim())),
            Span::styled("Esc", Style::default().fg(ui::accent())),
            Span::styled(" Close", Style::default().fg(ui::text_dim())),
        ]);
        f.render_widget(Paragraph::new(keys).alignment(ratatui::layout::Alignment::Center), chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn modal() -> BarcodeModal {
        let request = |name: &str, sku: &str| LabelRequest {
            name: name.to_string(),
            sku: sku.to_string(),
            price: 2.5,
            quantity: 1,
        };
        BarcodeModal::new(
            vec![request("Lip Balm", "PER-6004"), request("Notebook A5", "STA-5001")],
            &AppConfig::default(),
        )
    }

    #[test]
    fn test_quantities_adjust_per_row() {
        let mut modal = modal();
        modal.handle_key(key(KeyCode::Char('+')));
        modal.handle_key(key(KeyCode::Char('+')));
        modal.handle_key(key(KeyCode::Down));
        modal.handle_key(key(KeyCode::Char('-')));
        modal.handle_key(key(KeyCode::Char('-')));

        let quantities: Vec<u32> = modal.requests().iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![3, 0]);
        assert_eq!(modal.label_count(), 3);
    }

    #[test]
    fn test_paper_cycles() {
        let mut modal = modal();
        assert_eq!(modal.paper(), PaperSize::A4);
        modal.handle_key(key(KeyCode::Char('p')));
        assert_eq!(modal.paper(), PaperSize::A5);
    }

    #[test]
    fn test_enter_builds_document() {
        let mut modal = modal();
        modal.handle_key(key(KeyCode::Char('p')));

        match modal.handle_key(key(KeyCode::Enter)) {
            BarcodeAction::Print { html, labels } => {
                assert_eq!(labels, 2);
                assert!(html.contains("size: A5"));
                assert!(html.contains("<title>Backroom labels</title>"));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_nothing_to_print() {
        let mut modal = modal();
        modal.handle_key(key(KeyCode::Char('-')));
        modal.handle_key(key(KeyCode::Down));
        modal.handle_key(key(KeyCode::Char('-')));

        assert_eq!(
            modal.handle_key(key(KeyCode::Enter)),
            BarcodeAction::Status("Cannot print: no labels requested".to_string())
        );
        assert_eq!(modal.handle_key(key(KeyCode::Esc)), BarcodeAction::Close);
    }
}
