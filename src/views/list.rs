use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{Screen, ScreenEvent, ViewKind};
use crate::barcode::LabelRequest;
use crate::config::AppConfig;
use crate::store::models::Lookups;
use crate::store::{ListQuery, MemoryResource, Page, PageMeta, Record, StoreError};
use crate::table::{Column, TableComponent};
use crate::ui::{self, components};

/// A record type that has a list screen
pub trait Listing: Record {
    const KIND: ViewKind;
    /// Singular name used in messages
    const NOUN: &'static str;
    const FILTER_LABEL: &'static str;
    const PRINTS_LABELS: bool = false;

    fn columns() -> Vec<Column>;

    fn filter_options(lookups: &Lookups) -> Vec<String>;

    /// Human name of one row
    fn label(&self) -> String;

    fn cells(&self, config: &AppConfig) -> Vec<Cell<'static>>;

    fn label_request(&self) -> Option<LabelRequest> {
        None
    }
}

type FetchResult<T> = (u64, Result<Page<T>, StoreError>);

struct DeleteOutcome<T> {
    deleted: Vec<T>,
    failed: Vec<StoreError>,
}

pub struct ListView<T: Listing> {
    resource: Arc<MemoryResource<T>>,
    filter_options: Vec<String>,
    config: AppConfig,

    table: TableComponent<T>,
    /// Kept current by the table's selection callback
    selected: Rc<RefCell<Vec<T>>>,

    query: ListQuery,
    filter_index: Option<usize>,
    editing_search: bool,

    items: Vec<T>,
    meta: PageMeta,
    loading: bool,

    // Only the response to the latest request is applied
    request_seq: u64,
    fetch_tx: UnboundedSender<FetchResult<T>>,
    fetch_rx: UnboundedReceiver<FetchResult<T>>,

    delete_tx: UnboundedSender<DeleteOutcome<T>>,
    delete_rx: UnboundedReceiver<DeleteOutcome<T>>,
    pending_delete: Vec<String>,
    confirm: Option<String>,
    deleting: bool,
}

impl<T: Listing> ListView<T> {
    pub fn new(resource: Arc<MemoryResource<T>>, lookups: &Lookups, config: &AppConfig) -> Self {
        let selected = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selected);
        let table = TableComponent::new(T::columns(), |item: &T| item.id().to_string())
            .with_checkbox(true)
            .skeleton_rows(config.skeleton_rows)
            .on_selection_change(move |items: &[&T]| {
                *sink.borrow_mut() = items.iter().map(|item| (*item).clone()).collect();
            });

        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (delete_tx, delete_rx) = mpsc::unbounded_channel();

        Self {
            resource,
            filter_options: T::filter_options(lookups),
            config: config.clone(),
            table,
            selected,
            query: ListQuery::new(config.page_size),
            filter_index: None,
            editing_search: false,
            items: Vec::new(),
            meta: PageMeta {
                total: 0,
                page: 1,
                limit: config.page_size,
            },
            loading: false,
            request_seq: 0,
            fetch_tx,
            fetch_rx,
            delete_tx,
            delete_rx,
            pending_delete: Vec::new(),
            confirm: None,
            deleting: false,
        }
    }

    #[cfg(test)]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[cfg(test)]
    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.deleting
    }

    #[cfg(test)]
    pub fn confirm_message(&self) -> Option<&str> {
        self.confirm.as_deref()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.borrow().iter().map(|item| item.id().to_string()).collect()
    }

    /// Request the current query on a background task
    fn fetch(&mut self) {
        self.request_seq += 1;
        self.loading = true;

        let seq = self.request_seq;
        let query = self.query.clone();
        let resource = Arc::clone(&self.resource);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = resource.list(&query).await;
            let _ = tx.send((seq, result));
        });
    }

    /// Back to the first page with the current search and filter
    fn restart(&mut self) {
        self.query.page = 1;
        self.fetch();
    }

    fn apply_page(&mut self, seq: u64, result: Result<Page<T>, StoreError>) -> Option<ScreenEvent> {
        if seq != self.request_seq {
            tracing::debug!("{}: dropping stale response #{}", self.resource.name(), seq);
            return None;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                // The page emptied out (e.g. after deleting its last rows)
                if page.items.is_empty() && page.meta.page > page.meta.total_pages() {
                    self.query.page = page.meta.total_pages();
                    self.fetch();
                    return None;
                }
                self.items = page.items;
                self.meta = page.meta;
                self.table.reconcile(&self.items);
                None
            }
            Err(e) => {
                tracing::warn!("{}: load failed: {}", self.resource.name(), e);
                self.items.clear();
                self.table.reconcile(&self.items);
                Some(ScreenEvent::Status(format!("Failed to load {}s: {}", T::NOUN, e)))
            }
        }
    }

    fn cycle_filter(&mut self) {
        if self.filter_options.is_empty() {
            return;
        }
        self.filter_index = match self.filter_index {
            None => Some(0),
            Some(i) if i + 1 < self.filter_options.len() => Some(i + 1),
            Some(_) => None,
        };
        self.query.filter = self
            .filter_index
            .and_then(|i| self.filter_options.get(i).cloned());
        self.restart();
    }

    fn clear_filters(&mut self) {
        if self.query.search.is_empty() && self.query.filter.is_none() {
            return;
        }
        self.query.search.clear();
        self.query.filter = None;
        self.filter_index = None;
        self.restart();
    }

    fn ask_delete_current(&mut self) -> ScreenEvent {
        let Some(item) = self.items.get(self.table.cursor()) else {
            return ScreenEvent::None;
        };
        self.pending_delete = vec![item.id().to_string()];
        self.confirm = Some(format!("Delete {} '{}'?", T::NOUN, item.label()));
        ScreenEvent::None
    }

    fn ask_delete_selected(&mut self) -> ScreenEvent {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return ScreenEvent::Status("No rows selected".to_string());
        }
        self.confirm = Some(format!("Delete {} selected {}s?", ids.len(), T::NOUN));
        self.pending_delete = ids;
        ScreenEvent::None
    }

    fn start_delete(&mut self) {
        let ids = std::mem::take(&mut self.pending_delete);
        if ids.is_empty() {
            return;
        }
        self.deleting = true;

        let resource = Arc::clone(&self.resource);
        let tx = self.delete_tx.clone();
        tokio::spawn(async move {
            let mut outcome = DeleteOutcome {
                deleted: Vec::new(),
                failed: Vec::new(),
            };
            for id in ids {
                match resource.delete(&id).await {
                    Ok(row) => outcome.deleted.push(row),
                    Err(e) => outcome.failed.push(e),
                }
            }
            let _ = tx.send(outcome);
        });
    }

    fn finish_delete(&mut self, outcome: DeleteOutcome<T>) -> ScreenEvent {
        self.deleting = false;
        if !outcome.deleted.is_empty() {
            self.fetch();
        }

        match (outcome.deleted.as_slice(), outcome.failed.first()) {
            ([], Some(e)) => ScreenEvent::Status(format!("Delete failed: {}", e)),
            (deleted, Some(e)) => ScreenEvent::Status(format!(
                "Deleted {}, {} failed: {}",
                deleted.len(),
                outcome.failed.len(),
                e
            )),
            ([row], None) => ScreenEvent::Notify(format!("Deleted {} '{}'", T::NOUN, row.label())),
            (deleted, None) => ScreenEvent::Notify(format!("Deleted {} {}s", deleted.len(), T::NOUN)),
        }
    }

    /// Labels for the selected rows, or the row under the cursor when nothing is selected
    fn label_requests(&self) -> ScreenEvent {
        let mut requests: Vec<LabelRequest> = self
            .selected
            .borrow()
            .iter()
            .filter_map(Listing::label_request)
            .collect();
        if requests.is_empty() {
            requests.extend(
                self.items
                    .get(self.table.cursor())
                    .and_then(Listing::label_request),
            );
        }

        if requests.is_empty() {
            ScreenEvent::Status("Nothing to print".to_string())
        } else {
            ScreenEvent::OpenBarcodes(requests)
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> ScreenEvent {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.confirm = None;
                self.start_delete();
                ScreenEvent::Status("Deleting...".to_string())
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm = None;
                self.pending_delete.clear();
                ScreenEvent::Status("Delete cancelled".to_string())
            }
            _ => ScreenEvent::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing_search = false,
            KeyCode::Backspace => {
                if self.query.search.pop().is_some() {
                    self.restart();
                }
            }
            KeyCode::Char(c) => {
                self.query.search.push(c);
                self.restart();
            }
            _ => {}
        }
    }
}

impl<T: Listing> Screen for ListView<T> {
    fn kind(&self) -> ViewKind {
        T::KIND
    }

    fn activate(&mut self) {
        self.fetch();
    }

    fn tick(&mut self) -> Vec<ScreenEvent> {
        let mut events = Vec::new();

        while let Ok((seq, result)) = self.fetch_rx.try_recv() {
            events.extend(self.apply_page(seq, result));
        }
        while let Ok(outcome) = self.delete_rx.try_recv() {
            events.push(self.finish_delete(outcome));
        }

        events
    }

    fn handle_key(&mut self, key: KeyEvent) -> ScreenEvent {
        if self.confirm.is_some() {
            return self.handle_confirm_key(key);
        }
        if self.editing_search {
            self.handle_search_key(key);
            return ScreenEvent::None;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.table.move_down(self.items.len()),
            KeyCode::Char('k') | KeyCode::Up => self.table.move_up(self.items.len()),

            // Selection only applies to rows that are on screen
            KeyCode::Char(' ') if !self.loading => {
                let cursor = self.table.cursor();
                self.table.toggle_row(&self.items, cursor);
            }
            KeyCode::Char('a') if !self.loading => self.table.toggle_all(&self.items),
            KeyCode::Char('x') => self.table.clear_selection(&self.items),

            KeyCode::Char('/') => self.editing_search = true,
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('c') => self.clear_filters(),

            KeyCode::Char(']') | KeyCode::Right => {
                if self.meta.has_next() && !self.loading {
                    self.query.page = self.meta.page + 1;
                    self.fetch();
                }
            }
            KeyCode::Char('[') | KeyCode::Left => {
                if self.meta.has_prev() && !self.loading {
                    self.query.page = self.meta.page - 1;
                    self.fetch();
                }
            }

            KeyCode::Char('d') | KeyCode::Delete if !self.is_busy() => return self.ask_delete_current(),
            KeyCode::Char('D') if !self.is_busy() => return self.ask_delete_selected(),

            KeyCode::Char('r') => self.fetch(),
            KeyCode::Char('b') if T::PRINTS_LABELS && !self.loading => return self.label_requests(),
            _ => {}
        }
        ScreenEvent::None
    }

    fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filter bar
                Constraint::Min(5),    // Table
                Constraint::Length(1), // Pagination
            ])
            .split(area);

        components::draw_filter_bar(
            f,
            chunks[0],
            &components::FilterBar {
                search: &self.query.search,
                editing: self.editing_search,
                filter_label: T::FILTER_LABEL,
                filter: self.query.filter.as_deref(),
            },
        );

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", T::KIND.title()),
                Style::default().fg(ui::accent()).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui::accent()));

        let config = &self.config;
        self.table.render(
            f,
            chunks[1],
            &self.items,
            self.loading,
            block,
            !self.editing_search,
            |item, _, selected, options| {
                let cells = item.cells(config);
                if selected && !options.focused {
                    let tint = Style::default().fg(ui::accent_bright());
                    cells.into_iter().map(|cell| cell.style(tint)).collect()
                } else {
                    cells
                }
            },
        );

        let shown = if self.loading { 0 } else { self.items.len() };
        components::draw_pagination(f, chunks[2], &self.meta, shown, self.selected.borrow().len());

        if let Some(message) = &self.confirm {
            ui::draw_confirm_popup(f, message);
        }
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.editing_search {
            return vec![("Type", "Search"), ("Enter", "Done"), ("Esc", "Done")];
        }
        let mut hints = vec![
            ("↑↓", "Nav"),
            ("Space", "Select"),
            ("a", "All"),
            ("x", "Unselect"),
            ("/", "Search"),
            ("f", "Filter"),
            ("[ ]", "Page"),
            ("d", "Del"),
            ("D", "Del sel"),
        ];
        if T::PRINTS_LABELS {
            hints.push(("b", "Labels"));
        }
        hints
    }

    fn captures_input(&self) -> bool {
        self.editing_search || self.confirm.is_some()
    }

    fn apply_config(&mut self, config: &AppConfig) {
        self.table.set_skeleton_rows(config.skeleton_rows);
        let resized = config.page_size != self.query.limit;
        self.config = config.clone();
        if resized {
            self.query.limit = config.page_size;
            self.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock;
    use crate::store::models::{Product, Role};
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press<T: Listing>(view: &mut ListView<T>, keys: &str) -> Vec<ScreenEvent> {
        keys.chars().map(|c| view.handle_key(key(KeyCode::Char(c)))).collect()
    }

    async fn settle<T: Listing>(view: &mut ListView<T>) -> Vec<ScreenEvent> {
        let mut events = Vec::new();
        for _ in 0..200 {
            tokio::time::sleep(Duration::from_millis(1)).await;
            events.extend(view.tick());
            if !view.is_busy() {
                break;
            }
        }
        events
    }

    async fn products() -> ListView<Product> {
        let resources = mock::seed(Duration::ZERO);
        let mut view = ListView::new(resources.products, &resources.lookups, &AppConfig::default());
        view.activate();
        settle(&mut view).await;
        view
    }

    async fn roles() -> ListView<Role> {
        let resources = mock::seed(Duration::ZERO);
        let mut view = ListView::new(resources.roles, &resources.lookups, &AppConfig::default());
        view.activate();
        settle(&mut view).await;
        view
    }

    #[tokio::test]
    async fn test_activate_loads_first_page() {
        let view = products().await;

        assert!(!view.is_loading());
        assert_eq!(view.items().len(), 10);
        assert_eq!(view.meta().total, 24);
        assert_eq!(view.meta().total_pages(), 3);
    }

    #[tokio::test]
    async fn test_paging_stops_at_the_ends() {
        let mut view = products().await;

        for _ in 0..3 {
            view.handle_key(key(KeyCode::Char(']')));
            settle(&mut view).await;
        }
        assert_eq!(view.meta().page, 3);
        assert_eq!(view.items().len(), 4);

        view.handle_key(key(KeyCode::Left));
        settle(&mut view).await;
        assert_eq!(view.meta().page, 2);
    }

    #[tokio::test]
    async fn test_search_restarts_at_first_page() {
        let mut view = products().await;
        view.handle_key(key(KeyCode::Char(']')));
        settle(&mut view).await;

        press(&mut view, "/volt");
        assert!(view.captures_input());
        view.handle_key(key(KeyCode::Enter));
        settle(&mut view).await;

        assert!(!view.captures_input());
        assert_eq!(view.meta().page, 1);
        assert_eq!(view.meta().total, 3);
        assert!(view.items().iter().all(|p| p.brand == "Voltix"));
    }

    #[tokio::test]
    async fn test_filter_cycles_and_clears() {
        let mut view = products().await;

        press(&mut view, "f");
        settle(&mut view).await;
        assert_eq!(view.query.filter.as_deref(), Some("Beverages"));
        assert_eq!(view.meta().total, 4);

        press(&mut view, "c");
        settle(&mut view).await;
        assert_eq!(view.query.filter, None);
        assert_eq!(view.meta().total, 24);
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let mut view = products().await;
        let before = view.items().len();

        let stale = Page {
            items: Vec::new(),
            meta: PageMeta::default(),
        };
        view.fetch_tx.send((view.request_seq - 1, Ok(stale))).unwrap();
        view.tick();

        assert_eq!(view.items().len(), before);
    }

    #[tokio::test]
    async fn test_bulk_delete_prunes_selection() {
        let mut view = products().await;

        press(&mut view, "a");
        assert_eq!(view.selected_ids().len(), 10);

        press(&mut view, "D");
        assert_eq!(view.confirm_message(), Some("Delete 10 selected products?"));
        view.handle_key(key(KeyCode::Char('y')));
        let events = settle(&mut view).await;

        assert!(events.contains(&ScreenEvent::Notify("Deleted 10 products".to_string())));
        assert_eq!(view.meta().total, 14);
        assert!(view.selected_ids().is_empty());
        assert!(view.table.selection().is_empty());
    }

    #[tokio::test]
    async fn test_clear_selection_key() {
        let mut view = products().await;

        view.handle_key(key(KeyCode::Char(' ')));
        view.handle_key(key(KeyCode::Down));
        view.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(view.selected_ids().len(), 2);

        press(&mut view, "x");
        assert!(view.selected_ids().is_empty());
        assert_eq!(
            press(&mut view, "D"),
            vec![ScreenEvent::Status("No rows selected".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_without_selection() {
        let mut view = products().await;
        let events = press(&mut view, "D");
        assert_eq!(events, vec![ScreenEvent::Status("No rows selected".to_string())]);
        assert_eq!(view.confirm_message(), None);
    }

    #[tokio::test]
    async fn test_cancelled_delete_changes_nothing() {
        let mut view = products().await;

        press(&mut view, "d");
        assert!(view.confirm_message().is_some());
        view.handle_key(key(KeyCode::Esc));
        settle(&mut view).await;

        assert_eq!(view.confirm_message(), None);
        assert_eq!(view.meta().total, 24);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_list_unchanged() {
        let mut view = roles().await;
        assert_eq!(view.items()[0].name, "Admin");

        press(&mut view, "d");
        assert_eq!(view.confirm_message(), Some("Delete role 'Admin'?"));
        view.handle_key(key(KeyCode::Enter));
        let events = settle(&mut view).await;

        assert_eq!(view.confirm_message(), None);
        assert_eq!(view.items().len(), 5);
        assert!(events.contains(&ScreenEvent::Status(
            "Delete failed: record Admin is protected and cannot be deleted".to_string()
        )));
    }

    #[tokio::test]
    async fn test_emptied_last_page_steps_back() {
        let mut view = products().await;
        for _ in 0..2 {
            view.handle_key(key(KeyCode::Char(']')));
            settle(&mut view).await;
        }
        assert_eq!(view.meta().page, 3);

        press(&mut view, "aD");
        view.handle_key(key(KeyCode::Char('y')));
        settle(&mut view).await;

        assert_eq!(view.meta().page, 2);
        assert_eq!(view.meta().total, 20);
        assert_eq!(view.items().len(), 10);
    }

    #[tokio::test]
    async fn test_barcode_requests() {
        let mut view = products().await;

        let events = press(&mut view, "b");
        match &events[0] {
            ScreenEvent::OpenBarcodes(requests) => {
                assert_eq!(requests.len(), 1);
                assert_eq!(requests[0].sku, "BEV-1001");
                assert_eq!(requests[0].quantity, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }

        press(&mut view, " j j ");
        let events = press(&mut view, "b");
        match &events[0] {
            ScreenEvent::OpenBarcodes(requests) => assert_eq!(requests.len(), 3),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_roles_do_not_print_labels() {
        let mut view = roles().await;
        assert_eq!(press(&mut view, "b"), vec![ScreenEvent::None]);
    }

    #[tokio::test]
    async fn test_page_size_change_refetches() {
        let mut view = products().await;

        let config = AppConfig {
            page_size: 5,
            ..AppConfig::default()
        };
        view.apply_config(&config);
        settle(&mut view).await;

        assert_eq!(view.items().len(), 5);
        assert_eq!(view.meta().total_pages(), 5);
    }
}
