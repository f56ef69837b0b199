pub mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::theme;
use crate::views::ViewKind;

// Helper functions to get theme colors
pub(crate) fn accent() -> Color { theme::current().accent }
pub(crate) fn accent_bright() -> Color { theme::current().accent_bright }
pub(crate) fn inactive() -> Color { theme::current().inactive }
pub(crate) fn success() -> Color { theme::current().success }
pub(crate) fn warning() -> Color { theme::current().warning }
pub(crate) fn danger() -> Color { theme::current().danger }
pub(crate) fn text() -> Color { theme::current().text }
pub(crate) fn text_dim() -> Color { theme::current().text_dim }
pub(crate) fn header() -> Color { theme::current().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Screen tabs
            Constraint::Length(1), // Info line
            Constraint::Min(8),    // Active screen
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_tabs(f, app, chunks[0]);
    draw_info_line(f, app, chunks[1]);
    app.screen().draw(f, chunks[2]);
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Install => draw_install_popup(f, app),
        Popup::Barcode => {
            if let Some(modal) = &app.barcode {
                modal.draw(f);
            }
        }
    }
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let titles: Vec<Line> = ViewKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| Line::from(format!("{} {}", i + 1, kind.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current)
        .style(Style::default().fg(inactive()))
        .highlight_style(Style::default().fg(accent()).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(inactive())));
    f.render_widget(tabs, chunks[0]);

    let store = Paragraph::new(Span::styled(
        format!("{} ", app.config.store_name),
        Style::default().fg(header()).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right);
    f.render_widget(store, chunks[1]);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > ready
    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![Span::styled(status.as_str(), Style::default().fg(warning()))])
    } else {
        Line::from(vec![Span::styled(
            format!("{} │ Ready", app.screen().kind().title()),
            Style::default().fg(text_dim()),
        )])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut hints = app.screen().hints();
    if !app.screen().captures_input() {
        hints.extend([("Tab", "Next"), ("?", "Help"), ("q", "Quit")]);
    }

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 100 { 7 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    // Footer is commands legend ONLY - no status messages here
    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn help_section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("═══ {} ═══", title),
        Style::default().fg(header()).add_modifier(Modifier::BOLD),
    ))
}

fn help_entry(keys: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", keys), Style::default().fg(accent())),
        Span::raw(action.to_string()),
    ])
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 85 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        help_section("Navigation"),
        help_entry("Tab", "Next screen (Shift+Tab goes back)"),
        help_entry("1-7", "Jump to a screen"),
        help_entry("↑/↓ j/k", "Move up/down in lists"),
        Line::from(""),
        help_section("Lists"),
        help_entry("Space", "Select the row under the cursor"),
        help_entry("a", "Select or clear every row on the page"),
        help_entry("x", "Clear the selection"),
        help_entry("/", "Search (Enter or Esc when done)"),
        help_entry("f", "Cycle the filter"),
        help_entry("c", "Clear search and filter"),
        help_entry("[ ] ← →", "Previous/next page"),
        help_entry("d", "Delete the row under the cursor"),
        help_entry("D", "Delete every selected row"),
        help_entry("r", "Reload"),
        help_entry("b", "Print barcode labels (products)"),
        Line::from(""),
        help_section("Barcode Labels"),
        help_entry("+/-", "Change label quantity"),
        help_entry("p", "Cycle paper size"),
        help_entry("Enter", "Open the print window"),
        Line::from(""),
        help_section("Settings"),
        help_entry("Enter", "Edit field or cycle choice"),
        help_entry("F2 s", "Save settings"),
        help_entry("Esc", "Revert unsaved changes"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Backroom Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_install_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(50, 30, f.area());

    f.render_widget(Clear, popup_area);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Install {} to your applications menu?", app.config.store_name),
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Adds a launcher so the back-office opens like any other app.",
            Style::default().fg(text_dim()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Install   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" Not now"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Install ", Style::default().fg(accent_bright())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(content, popup_area);
}

pub(crate) fn draw_confirm_popup(f: &mut Frame, message: &str) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(confirm, popup_area);
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
