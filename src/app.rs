use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

use crate::barcode::print::open_print_window;
use crate::config::AppConfig;
use crate::install::{InstallPrompt, Outcome};
use crate::store::Resources;
use crate::views::barcode::{BarcodeAction, BarcodeModal};
use crate::views::{self, Screen, ScreenEvent, ViewKind};

/// Seconds a status message stays on the info line
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Install,
    Barcode,
}

pub struct App {
    pub config: AppConfig,
    pub popup: Popup,

    pub screens: Vec<Box<dyn Screen>>,
    pub current: usize,

    pub barcode: Option<BarcodeModal>,
    install: Option<InstallPrompt>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(
        config: AppConfig,
        resources: &Resources,
        start: ViewKind,
        install: Option<InstallPrompt>,
    ) -> Self {
        let screens = views::build_screens(resources, &config);

        let mut app = Self {
            config,
            popup: Popup::None,
            screens,
            current: start.index(),
            barcode: None,
            install,
            status_message: None,
            status_message_time: None,
        };
        app.screens[app.current].activate();

        if let Some(install) = app.install.as_mut() {
            if install.dispatch_if_installable() && install.should_show() {
                tracing::info!("Offering launcher install");
                app.popup = Popup::Install;
            }
        }

        app
    }

    pub fn screen(&self) -> &dyn Screen {
        self.screens[self.current].as_ref()
    }

    /// Quitting with 'q' is allowed when nothing else wants the key
    pub fn can_quit(&self) -> bool {
        self.popup == Popup::None && !self.screen().captures_input()
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    fn notify(&mut self, msg: String) {
        if self.config.notifications {
            if let Err(e) = crate::notify(&self.config.store_name, &msg) {
                tracing::warn!("Notification failed: {}", e);
            }
        }
        self.set_status(msg);
    }

    fn switch_to(&mut self, index: usize) {
        if index != self.current && index < self.screens.len() {
            self.current = index;
            self.screens[index].activate();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        if !self.screen().captures_input() {
            match key.code {
                KeyCode::Tab => {
                    self.switch_to((self.current + 1) % self.screens.len());
                    return Ok(());
                }
                KeyCode::BackTab => {
                    let previous = self.current.checked_sub(1).unwrap_or(self.screens.len() - 1);
                    self.switch_to(previous);
                    return Ok(());
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    self.switch_to(index);
                    return Ok(());
                }
                KeyCode::Char('?') | KeyCode::Char('h') => {
                    self.popup = Popup::Help;
                    return Ok(());
                }
                _ => {}
            }
        }

        let event = self.screens[self.current].handle_key(key);
        self.handle_event(event)
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::Install => {
                let outcome = match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => Outcome::Accepted,
                    KeyCode::Char('n') | KeyCode::Esc => Outcome::Dismissed,
                    _ => return Ok(()),
                };
                self.popup = Popup::None;
                if let Some(install) = self.install.as_mut() {
                    match install.show() {
                        Ok(responder) => responder.respond(outcome),
                        Err(e) => self.set_status(format!("Install: {}", e)),
                    }
                }
            }
            Popup::Barcode => {
                let Some(modal) = self.barcode.as_mut() else {
                    self.popup = Popup::None;
                    return Ok(());
                };
                match modal.handle_key(key) {
                    BarcodeAction::None => {}
                    BarcodeAction::Close => self.close_barcodes(),
                    BarcodeAction::Status(msg) => self.set_status(msg),
                    BarcodeAction::Print { html, labels } => {
                        self.close_barcodes();
                        match open_print_window(&html) {
                            Ok(_) => self.notify(format!("Sent {} labels to the print window", labels)),
                            Err(e) => self.set_status(format!("Print failed: {}", e)),
                        }
                    }
                }
            }
            Popup::None => {}
        }
        Ok(())
    }

    fn close_barcodes(&mut self) {
        self.barcode = None;
        self.popup = Popup::None;
    }

    fn handle_event(&mut self, event: ScreenEvent) -> Result<()> {
        match event {
            ScreenEvent::None => {}
            ScreenEvent::Status(msg) => self.set_status(msg),
            ScreenEvent::Notify(msg) => self.notify(msg),
            ScreenEvent::OpenBarcodes(requests) => {
                self.barcode = Some(BarcodeModal::new(requests, &self.config));
                self.popup = Popup::Barcode;
            }
            ScreenEvent::ConfigChanged(config) => {
                config.save()?;
                self.apply_config(config);
                self.set_status("Settings saved");
            }
        }
        Ok(())
    }

    fn apply_config(&mut self, config: AppConfig) {
        for screen in &mut self.screens {
            screen.apply_config(&config);
        }
        self.config = config;
    }

    pub fn tick(&mut self) -> Result<()> {
        // Drain background work of the visible screen
        let events = self.screens[self.current].tick();
        for event in events {
            self.handle_event(event)?;
        }

        if let Some(install) = self.install.as_mut() {
            match install.poll() {
                Some(Ok(Outcome::Accepted)) => self.notify("Launcher installed".to_string()),
                Some(Ok(Outcome::Dismissed)) => self.set_status("Install skipped for this session"),
                Some(Err(e)) => self.set_status(format!("Install failed: {}", e)),
                None => {}
            }
        }

        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        Ok(())
    }
}
