//! Widgets shared by the page views: filter bar, pagination line and summary cards

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{accent, header, inactive, text, text_dim};
use crate::store::PageMeta;

pub struct FilterBar<'a> {
    pub search: &'a str,
    pub editing: bool,
    pub filter_label: &'a str,
    pub filter: Option<&'a str>,
}

pub fn draw_filter_bar(f: &mut Frame, area: Rect, bar: &FilterBar) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let border_color = if bar.editing { accent() } else { inactive() };
    let search_line = if bar.search.is_empty() && !bar.editing {
        Line::from(Span::styled("Press / to search", Style::default().fg(text_dim())))
    } else {
        let mut spans = vec![Span::styled(bar.search, Style::default().fg(text()))];
        if bar.editing {
            spans.push(Span::styled("█", Style::default().fg(accent())));
        }
        Line::from(spans)
    };

    let search = Paragraph::new(search_line).block(
        Block::default()
            .title(Span::styled(" Search ", Style::default().fg(border_color)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    f.render_widget(search, chunks[0]);

    let value = match bar.filter {
        Some(value) => Span::styled(value, Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
        None => Span::styled("All", Style::default().fg(text_dim())),
    };
    let filter = Paragraph::new(Line::from(vec![value])).block(
        Block::default()
            .title(Span::styled(
                format!(" (f) {} ", bar.filter_label),
                Style::default().fg(inactive()),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(inactive())),
    );
    f.render_widget(filter, chunks[1]);
}

/// "Showing 11-20 of 24" on the left, "Page 2 of 3" on the right
pub fn pagination_text(meta: &PageMeta, shown: usize) -> (String, String) {
    let range = if meta.total == 0 || shown == 0 {
        "No results".to_string()
    } else {
        let first = meta.offset() + 1;
        format!("Showing {}-{} of {}", first, first + shown - 1, meta.total)
    };
    (range, format!("Page {} of {}", meta.page.max(1), meta.total_pages()))
}

pub fn draw_pagination(f: &mut Frame, area: Rect, meta: &PageMeta, shown: usize, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (range, page) = pagination_text(meta, shown);
    let mut left = vec![Span::styled(format!(" {}", range), Style::default().fg(text_dim()))];
    if selected > 0 {
        left.push(Span::styled(
            format!(" │ {} selected", selected),
            Style::default().fg(accent()),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(left)), chunks[0]);

    let arrow = |enabled: bool, symbol: &'static str| {
        let color = if enabled { accent() } else { inactive() };
        Span::styled(symbol, Style::default().fg(color))
    };
    let right = Line::from(vec![
        arrow(meta.has_prev(), "◀ "),
        Span::styled(page, Style::default().fg(text())),
        arrow(meta.has_next(), " ▶ "),
    ]);
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
}

pub fn draw_card(f: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let card = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(format!(" {} ", title), Style::default().fg(header())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(inactive())),
    );
    f.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_text() {
        let meta = PageMeta {
            total: 24,
            page: 2,
            limit: 10,
        };
        assert_eq!(
            pagination_text(&meta, 10),
            ("Showing 11-20 of 24".to_string(), "Page 2 of 3".to_string())
        );

        let last = PageMeta { page: 3, ..meta };
        assert_eq!(pagination_text(&last, 4).0, "Showing 21-24 of 24");
    }

    #[test]
    fn test_pagination_text_empty() {
        let meta = PageMeta {
            total: 0,
            page: 1,
            limit: 10,
        };
        assert_eq!(
            pagination_text(&meta, 0),
            ("No results".to_string(), "Page 1 of 1".to_string())
        );
    }
}
