//! Settings form. Values are edited as text and validated together on save.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Screen, ScreenEvent, ViewKind};
use crate::barcode::PaperSize;
use crate::config::{AppConfig, PAGE_SIZE_RANGE, SKELETON_ROWS_RANGE};
use crate::ui;

const STORE_NAME_MAX: usize = 40;
const CURRENCY_MAX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StoreName,
    Currency,
    PageSize,
    SkeletonRows,
    PaperSize,
    Notifications,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::StoreName,
        Field::Currency,
        Field::PageSize,
        Field::SkeletonRows,
        Field::PaperSize,
        Field::Notifications,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::StoreName => "Store name",
            Field::Currency => "Currency symbol",
            Field::PageSize => "Rows per page",
            Field::SkeletonRows => "Loading placeholder rows",
            Field::PaperSize => "Label paper size",
            Field::Notifications => "Desktop notifications",
        }
    }

    /// Choice fields cycle through fixed values instead of taking text
    fn is_choice(&self) -> bool {
        matches!(self, Field::PaperSize | Field::Notifications)
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn form_values(config: &AppConfig) -> Vec<String> {
    Field::ALL
        .iter()
        .map(|field| match field {
            Field::StoreName => config.store_name.clone(),
            Field::Currency => config.currency.clone(),
            Field::PageSize => config.page_size.to_string(),
            Field::SkeletonRows => config.skeleton_rows.to_string(),
            Field::PaperSize => config.paper_size.to_string(),
            Field::Notifications => yes_no(config.notifications),
        })
        .collect()
}

fn parse_in_range(raw: &str, (min, max): (usize, usize)) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(format!("Enter a whole number from {} to {}", min, max)),
    }
}

fn text_length(raw: &str, max: usize) -> Result<String, String> {
    let value = raw.trim();
    match value.chars().count() {
        0 => Err("Required".to_string()),
        n if n > max => Err(format!("At most {} characters", max)),
        _ => Ok(value.to_string()),
    }
}

/// Apply `values` on top of `base`. Every invalid field is reported, in field order.
pub fn validate(base: &AppConfig, values: &[String]) -> Result<AppConfig, Vec<(Field, String)>> {
    let mut config = base.clone();
    let mut errors = Vec::new();

    for (field, raw) in Field::ALL.iter().zip(values) {
        let result = match field {
            Field::StoreName => text_length(raw, STORE_NAME_MAX).map(|v| config.store_name = v),
            Field::Currency => text_length(raw, CURRENCY_MAX).map(|v| config.currency = v),
            Field::PageSize => parse_in_range(raw, PAGE_SIZE_RANGE).map(|v| config.page_size = v),
            Field::SkeletonRows => {
                parse_in_range(raw, SKELETON_ROWS_RANGE).map(|v| config.skeleton_rows = v)
            }
            Field::PaperSize => raw
                .parse::<PaperSize>()
                .map(|v| config.paper_size = v)
                .map_err(|e| e.to_string()),
            Field::Notifications => match raw.trim().to_lowercase().as_str() {
                "yes" | "no" => {
                    config.notifications = raw.trim().eq_ignore_ascii_case("yes");
                    Ok(())
                }
                _ => Err("Enter yes or no".to_string()),
            },
        };
        if let Err(message) = result {
            errors.push((*field, message));
        }
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

pub struct SettingsView {
    config: AppConfig,
    values: Vec<String>,
    errors: Vec<Option<String>>,
    focus: usize,
    editing: bool,
}

impl SettingsView {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            values: form_values(config),
            errors: vec![None; Field::ALL.len()],
            focus: 0,
            editing: false,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field as usize]
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors[field as usize].as_deref()
    }

    fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    fn is_dirty(&self) -> bool {
        self.values != form_values(&self.config)
    }

    fn cycle_choice(&mut self) {
        let field = self.focused();
        let value = &mut self.values[self.focus];
        match field {
            Field::PaperSize => {
                let next = value.parse::<PaperSize>().unwrap_or_default().next();
                *value = next.to_string();
            }
            Field::Notifications => {
                let on = value.eq_ignore_ascii_case("yes");
                *value = yes_no(!on);
            }
            _ => {}
        }
    }

    fn revert(&mut self) -> ScreenEvent {
        self.values = form_values(&self.config);
        self.errors = vec![None; Field::ALL.len()];
        ScreenEvent::Status("Changes reverted".to_string())
    }

    fn save(&mut self) -> ScreenEvent {
        self.editing = false;
        self.errors = vec![None; Field::ALL.len()];

        match validate(&self.config, &self.values) {
            Ok(config) => {
                self.config = config.clone();
                self.values = form_values(&config);
                ScreenEvent::ConfigChanged(config)
            }
            Err(errors) => {
                let count = errors.len();
                for (field, message) in errors {
                    self.errors[field as usize] = Some(message);
                }
                ScreenEvent::Status(format!(
                    "Fix {} field{} before saving",
                    count,
                    if count == 1 { "" } else { "s" }
                ))
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> ScreenEvent {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing = false,
            KeyCode::F(2) => return self.save(),
            KeyCode::Backspace => {
                self.values[self.focus].pop();
            }
            KeyCode::Char(c) => {
                let limit = match self.focused() {
                    Field::StoreName => STORE_NAME_MAX,
                    Field::Currency => CURRENCY_MAX,
                    _ => 3,
                };
                // One past the limit so the length error can still show
                if self.values[self.focus].chars().count() <= limit {
                    self.values[self.focus].push(c);
                }
            }
            _ => {}
        }
        ScreenEvent::None
    }
}

impl Screen for SettingsView {
    fn kind(&self) -> ViewKind {
        ViewKind::Settings
    }

    fn activate(&mut self) {}

    fn tick(&mut self) -> Vec<ScreenEvent> {
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> ScreenEvent {
        if self.editing {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.focus = (self.focus + 1) % Field::ALL.len();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.focus = self.focus.checked_sub(1).unwrap_or(Field::ALL.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.focused().is_choice() {
                    self.cycle_choice();
                } else {
                    self.editing = true;
                }
            }
            KeyCode::F(2) | KeyCode::Char('s') => return self.save(),
            KeyCode::Esc if self.is_dirty() => return self.revert(),
            _ => {}
        }
        ScreenEvent::None
    }

    fn draw(&self, f: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        for (i, &field) in Field::ALL.iter().enumerate() {
            let focused = i == self.focus;
            let label_style = if focused {
                Style::default().fg(ui::accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(ui::header())
            };
            let marker = if focused { "▶ " } else { "  " };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(ui::accent())),
                Span::styled(field.label(), label_style),
            ]));

            let mut value = vec![Span::raw("    ")];
            if field.is_choice() {
                value.push(Span::styled("◀ ", Style::default().fg(ui::inactive())));
                value.push(Span::styled(self.value(field), Style::default().fg(ui::text())));
                value.push(Span::styled(" ▶", Style::default().fg(ui::inactive())));
            } else {
                value.push(Span::styled(self.value(field), Style::default().fg(ui::text())));
                if focused && self.editing {
                    value.push(Span::styled("█", Style::default().fg(ui::accent())));
                }
            }
            lines.push(Line::from(value));

            match self.error(field) {
                Some(error) => lines.push(Line::from(Span::styled(
                    format!("    {}", error),
                    Style::default().fg(ui::danger()),
                ))),
                None => lines.push(Line::from("")),
            }
        }

        let title = if self.is_dirty() { " Settings (unsaved) " } else { " Settings " };
        let form = Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(ui::accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ui::accent())),
        );
        f.render_widget(form, area);
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.editing {
            vec![("Type", "Edit"), ("Enter", "Done"), ("F2", "Save")]
        } else {
            vec![("↑↓", "Field"), ("Enter", "Edit"), ("s", "Save"), ("Esc", "Revert")]
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn apply_config(&mut self, config: &AppConfig) {
        self.config = config.clone();
        self.values = form_values(config);
        self.errors = vec![None; Field::ALL.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn values(overrides: &[(Field, &str)]) -> Vec<String> {
        let mut values = form_values(&AppConfig::default());
        for (field, value) in overrides {
            values[*field as usize] = value.to_string();
        }
        values
    }

    #[test]
    fn test_valid_form_applies_every_field() {
        let config = validate(
            &AppConfig::default(),
            &values(&[
                (Field::StoreName, "  Corner Shop "),
                (Field::Currency, "€"),
                (Field::PageSize, "25"),
                (Field::PaperSize, "letter"),
                (Field::Notifications, "YES"),
            ]),
        )
        .unwrap();

        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.currency, "€");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.paper_size, PaperSize::Letter);
        assert!(config.notifications);
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let errors = validate(
            &AppConfig::default(),
            &values(&[
                (Field::StoreName, ""),
                (Field::Currency, "EURO"),
                (Field::PageSize, "4"),
                (Field::SkeletonRows, "abc"),
                (Field::PaperSize, "B5"),
                (Field::Notifications, "maybe"),
            ]),
        )
        .unwrap_err();

        let fields: Vec<Field> = errors.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, Field::ALL.to_vec());
        assert_eq!(errors[0].1, "Required");
        assert_eq!(errors[1].1, "At most 3 characters");
        assert_eq!(errors[2].1, "Enter a whole number from 5 to 100");
    }

    #[test]
    fn test_store_name_length_limit() {
        let long = "x".repeat(STORE_NAME_MAX + 1);
        let errors = validate(&AppConfig::default(), &values(&[(Field::StoreName, &long)])).unwrap_err();
        assert_eq!(errors, vec![(Field::StoreName, "At most 40 characters".to_string())]);
    }

    #[test]
    fn test_invalid_save_keeps_config_and_shows_errors() {
        let mut view = SettingsView::new(&AppConfig::default());
        view.focus = Field::PageSize as usize;
        view.handle_key(key(KeyCode::Enter));
        view.handle_key(key(KeyCode::Backspace));
        view.handle_key(key(KeyCode::Backspace));
        view.handle_key(key(KeyCode::Char('0')));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.value(Field::PageSize), "0");

        let event = view.handle_key(key(KeyCode::Char('s')));
        assert_eq!(event, ScreenEvent::Status("Fix 1 field before saving".to_string()));
        assert!(view.error(Field::PageSize).is_some());
        assert_eq!(view.config.page_size, 10);
    }

    #[test]
    fn test_valid_save_emits_config() {
        let mut view = SettingsView::new(&AppConfig::default());
        view.focus = Field::PaperSize as usize;
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.value(Field::PaperSize), "A5");

        view.handle_key(key(KeyCode::Down));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.value(Field::Notifications), "yes");

        match view.handle_key(key(KeyCode::F(2))) {
            ScreenEvent::ConfigChanged(config) => {
                assert_eq!(config.paper_size, PaperSize::A5);
                assert!(config.notifications);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!view.is_dirty());
    }

    #[test]
    fn test_editing_captures_input() {
        let mut view = SettingsView::new(&AppConfig::default());
        assert!(!view.captures_input());

        view.handle_key(key(KeyCode::Enter));
        assert!(view.captures_input());
        view.handle_key(key(KeyCode::Char('q')));
        assert_eq!(view.value(Field::StoreName), "Backroomq");

        view.handle_key(key(KeyCode::Esc));
        assert!(!view.captures_input());
        view.handle_key(key(KeyCode::Esc));
        assert_eq!(view.value(Field::StoreName), "Backroom");
    }
}
