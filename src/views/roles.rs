use ratatui::{layout::Constraint, style::Style, text::Span, widgets::Cell};

use super::{Listing, ViewKind};
use crate::config::AppConfig;
use crate::store::models::{Lookups, Role};
use crate::table::Column;
use crate::ui;

impl Listing for Role {
    const KIND: ViewKind = ViewKind::Roles;
    const NOUN: &'static str = "role";
    const FILTER_LABEL: &'static str = "Type";

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Name", Constraint::Length(14)),
            Column::new("Description", Constraint::Min(24)),
            Column::new("Permissions", Constraint::Length(30)),
            Column::new("Users", Constraint::Length(6)),
            Column::new("Type", Constraint::Length(8)),
        ]
    }

    fn filter_options(_lookups: &Lookups) -> Vec<String> {
        vec!["System".to_string(), "Custom".to_string()]
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn cells(&self, _config: &AppConfig) -> Vec<Cell<'static>> {
        let (kind, color) = if self.system {
            ("System", ui::accent())
        } else {
            ("Custom", ui::text_dim())
        };
        let permissions = if self.permissions.iter().any(|p| p == "*") {
            "all".to_string()
        } else {
            self.permissions.join(", ")
        };

        vec![
            Cell::from(self.name.clone()),
            Cell::from(self.description.clone()),
            Cell::from(permissions),
            Cell::from(self.users.to_string()),
            Cell::from(Span::styled(kind, Style::default().fg(color))),
        ]
    }
}
