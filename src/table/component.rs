use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::selection::{self, Selection};
use crate::theme;

/// Message shown in place of rows when a loaded table has nothing to show
pub const NO_DATA: &str = "No data available";

const CHECKBOX_WIDTH: u16 = 3;
const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";
const SKELETON: &str = "░░░░░░";

/// A header slot. Columns describe layout only, the row renderer owns cell content.
#[derive(Debug, Clone)]
pub struct Column {
    pub title: String,
    pub width: Constraint,
}

impl Column {
    pub fn new(title: impl Into<String>, width: Constraint) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

/// Extra context handed to the row renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOptions {
    /// Row sits under the keyboard cursor of a focused table
    pub focused: bool,
}

/// Which of the three mutually exclusive body layouts a render produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Skeleton { rows: usize },
    Empty { colspan: usize },
    Rows { count: usize },
}

type RowKeyFn<T> = Box<dyn Fn(&T) -> String>;
type SelectionListener<T> = Box<dyn FnMut(&[&T])>;

/// Generic list table with an optional leading checkbox column.
///
/// The table never owns rows: every call that needs them takes the current
/// `data` slice from the owning view. Selection is kept as row keys and the
/// reported selection is always recomputed by filtering `data`.
pub struct TableComponent<T> {
    columns: Vec<Column>,
    row_key: RowKeyFn<T>,
    with_checkbox: bool,
    skeleton_row_count: usize,
    selection: Selection,
    listener: Option<SelectionListener<T>>,
    cursor: usize,
}

impl<T> TableComponent<T> {
    pub fn new(columns: Vec<Column>, row_key: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            columns,
            row_key: Box::new(row_key),
            with_checkbox: false,
            skeleton_row_count: 5,
            selection: Selection::new(),
            listener: None,
            cursor: 0,
        }
    }

    pub fn with_checkbox(mut self, enabled: bool) -> Self {
        self.with_checkbox = enabled;
        self
    }

    pub fn skeleton_rows(mut self, count: usize) -> Self {
        self.skeleton_row_count = count;
        self
    }

    /// Called with the selected subset of `data` every time the selection changes
    pub fn on_selection_change(mut self, listener: impl FnMut(&[&T]) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_skeleton_rows(&mut self, count: usize) {
        self.skeleton_row_count = count;
    }

    #[cfg(test)]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.selection.contains(&(self.row_key)(item))
    }

    /// True exactly when there are rows and every one of them is selected
    pub fn is_all_selected(&self, data: &[T]) -> bool {
        !data.is_empty() && data.iter().all(|item| self.is_selected(item))
    }

    pub fn selected_items<'d>(&self, data: &'d [T]) -> Vec<&'d T> {
        data.iter().filter(|item| self.is_selected(item)).collect()
    }

    /// Flip the row at `index`. Returns false when nothing changed.
    pub fn toggle_row(&mut self, data: &[T], index: usize) -> bool {
        if !self.with_checkbox {
            return false;
        }
        let Some(item) = data.get(index) else {
            return false;
        };
        let key = (self.row_key)(item);
        self.selection.toggle(&key);
        self.notify(data);
        true
    }

    /// Select every row of `data`, or clear everything when all are already selected
    pub fn toggle_all(&mut self, data: &[T]) {
        if !self.with_checkbox {
            return;
        }
        let next = if self.is_all_selected(data) {
            Selection::new()
        } else {
            data.iter().map(|item| (self.row_key)(item)).collect()
        };
        if next != self.selection {
            self.selection = next;
            self.notify(data);
        }
    }

    pub fn clear_selection(&mut self, data: &[T]) {
        if !self.with_checkbox || self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.notify(data);
    }

    /// Prune keys that `data` no longer produces. Call whenever the data changes.
    pub fn reconcile(&mut self, data: &[T]) {
        self.clamp_cursor(data.len());
        if !self.with_checkbox {
            return;
        }
        let next = selection::reconcile(&self.selection, data, |item| (self.row_key)(item));
        if next != self.selection {
            tracing::debug!(
                "Pruned {} stale selection keys",
                self.selection.len() - next.len()
            );
            self.selection = next;
            self.notify(data);
        }
    }

    fn notify(&mut self, data: &[T]) {
        let items = self.selected_items(data);
        if let Some(listener) = self.listener.as_mut() {
            listener(&items);
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_down(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    pub fn move_up(&mut self, len: usize) {
        if len > 0 {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1);
        }
    }

    pub fn clamp_cursor(&mut self, len: usize) {
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// Cells a full-width row spans
    pub fn colspan(&self) -> usize {
        self.columns.len() + usize::from(self.with_checkbox)
    }

    pub fn body(&self, data: &[T], loading: bool) -> BodyState {
        if loading {
            BodyState::Skeleton {
                rows: self.skeleton_row_count,
            }
        } else if data.is_empty() {
            BodyState::Empty {
                colspan: self.colspan(),
            }
        } else {
            BodyState::Rows { count: data.len() }
        }
    }

    pub fn widths(&self) -> Vec<Constraint> {
        let mut widths = Vec::with_capacity(self.colspan());
        if self.with_checkbox {
            widths.push(Constraint::Length(CHECKBOX_WIDTH));
        }
        widths.extend(self.columns.iter().map(|c| c.width));
        widths
    }

    pub fn header(&self, data: &[T]) -> Row<'static> {
        let theme = theme::current();
        let style = Style::default()
            .fg(theme.header)
            .add_modifier(Modifier::BOLD);

        let mut cells = Vec::with_capacity(self.colspan());
        if self.with_checkbox {
            let mark = if self.is_all_selected(data) { CHECKED } else { UNCHECKED };
            cells.push(Cell::from(Span::styled(mark, style)));
        }
        for column in &self.columns {
            cells.push(Cell::from(Span::styled(column.title.clone(), style)));
        }
        Row::new(cells)
    }

    /// Body rows for the current state. The empty state yields no rows here;
    /// `render` draws its spanning message across the whole body width.
    pub fn rows<'a, R>(
        &self,
        data: &'a [T],
        loading: bool,
        focused: bool,
        mut render_row: R,
    ) -> Vec<Row<'a>>
    where
        R: FnMut(&'a T, usize, bool, &RowOptions) -> Vec<Cell<'a>>,
    {
        let theme = theme::current();

        match self.body(data, loading) {
            BodyState::Skeleton { rows } => {
                let dim = Style::default().fg(theme.text_dim);
                (0..rows)
                    .map(|_| {
                        Row::new(
                            (0..self.colspan()).map(|_| Cell::from(Span::styled(SKELETON, dim))),
                        )
                    })
                    .collect()
            }
            BodyState::Empty { .. } => Vec::new(),
            BodyState::Rows { .. } => data
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let is_selected = self.is_selected(item);
                    let options = RowOptions {
                        focused: focused && index == self.cursor,
                    };

                    let mut cells = Vec::with_capacity(self.colspan());
                    if self.with_checkbox {
                        let (mark, color) = if is_selected {
                            (CHECKED, theme.accent)
                        } else {
                            (UNCHECKED, theme.text_dim)
                        };
                        cells.push(Cell::from(Span::styled(mark, Style::default().fg(color))));
                    }
                    cells.extend(render_row(item, index, is_selected, &options));
                    Row::new(cells)
                })
                .collect(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render<'a, R>(
        &self,
        f: &mut Frame,
        area: Rect,
        data: &'a [T],
        loading: bool,
        block: Block<'a>,
        focused: bool,
        render_row: R,
    ) where
        R: FnMut(&'a T, usize, bool, &RowOptions) -> Vec<Cell<'a>>,
    {
        let theme = theme::current();
        let body = self.body(data, loading);
        let inner = block.inner(area);

        let table = Table::new(self.rows(data, loading, focused, render_row), self.widths())
            .header(self.header(data))
            .block(block)
            .row_highlight_style(Style::default().bg(theme.bg_selected).fg(theme.text));

        let mut state = TableState::default();
        if focused && matches!(body, BodyState::Rows { .. }) {
            state.select(Some(self.cursor));
        }
        f.render_stateful_widget(table, area, &mut state);

        if let BodyState::Empty { .. } = body {
            if inner.height > 1 {
                let line = Rect {
                    x: inner.x,
                    y: inner.y + 1,
                    width: inner.width,
                    height: 1,
                };
                let message = Paragraph::new(Span::styled(NO_DATA, Style::default().fg(theme.text_dim)))
                    .alignment(Alignment::Center);
                f.render_widget(message, line);
            }
        }
    }
}
