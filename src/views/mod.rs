//! Page views. Every tab of the back-office is a `Screen`; the list screens
//! share one generic implementation driven by the `Listing` trait.

pub mod barcode;
pub mod dashboard;
pub mod expenses;
pub mod list;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod roles;
pub mod settings;

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::barcode::LabelRequest;
use crate::config::AppConfig;
use crate::store::Resources;

pub use list::{ListView, Listing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewKind {
    Dashboard,
    Products,
    Purchases,
    Expenses,
    Reports,
    Roles,
    Settings,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        ViewKind::Dashboard,
        ViewKind::Products,
        ViewKind::Purchases,
        ViewKind::Expenses,
        ViewKind::Reports,
        ViewKind::Roles,
        ViewKind::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Dashboard => "Dashboard",
            ViewKind::Products => "Products",
            ViewKind::Purchases => "Purchases",
            ViewKind::Expenses => "Expenses",
            ViewKind::Reports => "Sales Report",
            ViewKind::Roles => "Roles",
            ViewKind::Settings => "Settings",
        }
    }

    /// Position in the tab bar
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

/// What a screen asks the app to do after handling input or a tick
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    None,
    Status(String),
    /// Status line plus a desktop notification when enabled
    Notify(String),
    OpenBarcodes(Vec<LabelRequest>),
    ConfigChanged(AppConfig),
}

pub trait Screen {
    fn kind(&self) -> ViewKind;

    /// Called whenever the screen becomes visible
    fn activate(&mut self);

    /// Drain finished background work
    fn tick(&mut self) -> Vec<ScreenEvent>;

    fn handle_key(&mut self, key: KeyEvent) -> ScreenEvent;

    fn draw(&self, f: &mut Frame, area: Rect);

    /// Footer legend
    fn hints(&self) -> Vec<(&'static str, &'static str)>;

    /// True while the screen wants every key, global shortcuts included
    fn captures_input(&self) -> bool {
        false
    }

    fn apply_config(&mut self, _config: &AppConfig) {}
}

/// One screen per tab, in `ViewKind::ALL` order
pub fn build_screens(resources: &Resources, config: &AppConfig) -> Vec<Box<dyn Screen>> {
    ViewKind::ALL
        .iter()
        .map(|kind| -> Box<dyn Screen> {
            match kind {
                ViewKind::Dashboard => Box::new(dashboard::DashboardView::new(resources.clone(), config)),
                ViewKind::Products => Box::new(ListView::new(
                    Arc::clone(&resources.products),
                    &resources.lookups,
                    config,
                )),
                ViewKind::Purchases => Box::new(ListView::new(
                    Arc::clone(&resources.purchases),
                    &resources.lookups,
                    config,
                )),
                ViewKind::Expenses => Box::new(ListView::new(
                    Arc::clone(&resources.expenses),
                    &resources.lookups,
                    config,
                )),
                ViewKind::Reports => Box::new(ListView::new(
                    Arc::clone(&resources.sales),
                    &resources.lookups,
                    config,
                )),
                ViewKind::Roles => Box::new(ListView::new(
                    Arc::clone(&resources.roles),
                    &resources.lookups,
                    config,
                )),
                ViewKind::Settings => Box::new(settings::SettingsView::new(config)),
            }
        })
        .collect()
}
