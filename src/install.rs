//! Install prompt: the app offers itself for installation once per session
//! until the user accepts.
//!
//! The flow follows the deferred `beforeinstallprompt` contract: the event is
//! intercepted with `prevent_default`, kept, and later `prompt`ed; its
//! `user_choice` resolves once the user answers. Acceptance is remembered in
//! local storage, dismissal only in session storage.

use anyhow::{Context, Result};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::storage::{LocalStorage, SessionStorage};

pub const INSTALLED_KEY: &str = "pwa-installed";
pub const DISMISSED_KEY: &str = "pwa-prompt-dismissed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserChoice {
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    #[error("the install prompt was already shown")]
    AlreadyPrompted,
    #[error("no install prompt is available")]
    NoDeferredPrompt,
    #[error("install failed: {0}")]
    Target(String),
}

/// The intercepted install event
pub struct BeforeInstallPrompt {
    default_prevented: bool,
    responder: Option<oneshot::Sender<UserChoice>>,
    choice: Option<oneshot::Receiver<UserChoice>>,
}

impl Default for BeforeInstallPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl BeforeInstallPrompt {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            default_prevented: false,
            responder: Some(tx),
            choice: Some(rx),
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Show the prompt. Returns the handle the UI answers through; only once per event.
    pub fn prompt(&mut self) -> Result<PromptResponder, InstallError> {
        self.responder
            .take()
            .map(|tx| PromptResponder { tx })
            .ok_or(InstallError::AlreadyPrompted)
    }

    /// Resolves with the user's answer once the prompt is answered
    pub fn user_choice(&mut self) -> Option<oneshot::Receiver<UserChoice>> {
        self.choice.take()
    }
}

/// Answer side of a shown prompt
pub struct PromptResponder {
    tx: oneshot::Sender<UserChoice>,
}

impl PromptResponder {
    pub fn respond(self, outcome: Outcome) {
        // The receiver is gone only if the prompt was abandoned
        let _ = self.tx.send(UserChoice { outcome });
    }
}

/// What "installing" actually does on this platform
pub trait InstallTarget {
    fn is_installed(&self) -> bool;
    fn install(&self) -> Result<()>;
}

/// Desktop launcher entry under the XDG applications directory
pub struct DesktopLauncher {
    entry_path: PathBuf,
    exec: PathBuf,
}

impl DesktopLauncher {
    pub fn new(entry_path: PathBuf, exec: PathBuf) -> Self {
        Self { entry_path, exec }
    }

    pub fn for_current_exe() -> Option<Self> {
        let entry_path = dirs::data_dir()?.join("applications").join("backroom.desktop");
        let exec = std::env::current_exe().ok()?;
        Some(Self::new(entry_path, exec))
    }

    fn entry(&self) -> String {
        format!(
            "[Desktop Entry]\nType=Application\nName=Backroom\nComment=Point-of-sale back-office\nExec={}\nTerminal=true\nCategories=Office;Finance;\n",
            self.exec.display()
        )
    }
}

impl InstallTarget for DesktopLauncher {
    fn is_installed(&self) -> bool {
        self.entry_path.exists()
    }

    fn install(&self) -> Result<()> {
        if let Some(parent) = self.entry_path.parent() {
            std::fs::create_dir_all(parent).context("Could not create applications directory")?;
        }
        std::fs::write(&self.entry_path, self.entry())
            .with_context(|| format!("Could not write {}", self.entry_path.display()))?;
        tracing::info!("Installed launcher at {}", self.entry_path.display());
        Ok(())
    }
}

pub struct InstallPrompt {
    local: LocalStorage,
    session: SessionStorage,
    target: Box<dyn InstallTarget>,
    deferred: Option<BeforeInstallPrompt>,
    pending: Option<oneshot::Receiver<UserChoice>>,
}

impl InstallPrompt {
    pub fn new(local: LocalStorage, session: SessionStorage, target: Box<dyn InstallTarget>) -> Self {
        Self {
            local,
            session,
            target,
            deferred: None,
            pending: None,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.local.get(INSTALLED_KEY) == Some("true")
    }

    pub fn is_dismissed(&self) -> bool {
        self.session.get(DISMISSED_KEY) == Some("true")
    }

    /// Fire the install event when the target is missing. Returns whether it fired.
    pub fn dispatch_if_installable(&mut self) -> bool {
        if self.target.is_installed() {
            return false;
        }
        self.on_before_install_prompt(BeforeInstallPrompt::new());
        true
    }

    /// Event listener: suppress the default prompt and keep the event for later
    pub fn on_before_install_prompt(&mut self, mut event: BeforeInstallPrompt) {
        event.prevent_default();
        self.deferred = Some(event);
    }

    pub fn should_show(&self) -> bool {
        self.deferred.as_ref().is_some_and(BeforeInstallPrompt::default_prevented)
            && self.pending.is_none()
            && !self.is_installed()
            && !self.is_dismissed()
    }

    /// Prompt with the stored event and start waiting for the user's choice
    pub fn show(&mut self) -> Result<PromptResponder, InstallError> {
        let event = self.deferred.as_mut().ok_or(InstallError::NoDeferredPrompt)?;
        let responder = event.prompt()?;
        self.pending = event.user_choice();
        Ok(responder)
    }

    /// Apply the user's choice once it has resolved
    pub fn poll(&mut self) -> Option<Result<Outcome, InstallError>> {
        let receiver = self.pending.as_mut()?;
        let outcome = match receiver.try_recv() {
            Ok(choice) => choice.outcome,
            Err(TryRecvError::Empty) => return None,
            // Prompt abandoned without an answer
            Err(TryRecvError::Closed) => Outcome::Dismissed,
        };

        // A used event cannot be prompted again
        self.pending = None;
        self.deferred = None;
        Some(self.apply(outcome))
    }

    fn apply(&mut self, outcome: Outcome) -> Result<Outcome, InstallError> {
        match outcome {
            Outcome::Accepted => {
                self.target
                    .install()
                    .map_err(|e| InstallError::Target(e.to_string()))?;
                self.local
                    .set(INSTALLED_KEY, "true")
                    .map_err(|e| InstallError::Target(e.to_string()))?;
            }
            Outcome::Dismissed => self.session.set(DISMISSED_KEY, "true"),
        }
        tracing::info!("Install prompt resolved: {:?}", outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeTarget {
        installs: Rc<Cell<u32>>,
        fail: bool,
    }

    impl InstallTarget for FakeTarget {
        fn is_installed(&self) -> bool {
            self.installs.get() > 0
        }

        fn install(&self) -> Result<()> {
            if self.fail {
                anyhow::bail!("read-only filesystem");
            }
            self.installs.set(self.installs.get() + 1);
            Ok(())
        }
    }

    fn prompt(fail: bool) -> (InstallPrompt, Rc<Cell<u32>>) {
        let installs = Rc::new(Cell::new(0));
        let target = FakeTarget {
            installs: Rc::clone(&installs),
            fail,
        };
        let prompt = InstallPrompt::new(
            LocalStorage::in_memory(),
            SessionStorage::default(),
            Box::new(target),
        );
        (prompt, installs)
    }

    #[test]
    fn test_event_is_intercepted() {
        let (mut prompt, _) = prompt(false);
        assert!(!prompt.should_show());

        let mut event = BeforeInstallPrompt::new();
        assert!(!event.default_prevented());
        event.prompt().unwrap().respond(Outcome::Dismissed);

        let event = BeforeInstallPrompt::new();
        prompt.on_before_install_prompt(event);
        assert!(prompt.should_show());
        assert!(prompt.deferred.as_ref().unwrap().default_prevented());
    }

    #[test]
    fn test_event_not_intercepted_is_not_shown() {
        let (mut prompt, _) = prompt(false);
        prompt.deferred = Some(BeforeInstallPrompt::new());
        assert!(!prompt.should_show());

        prompt.on_before_install_prompt(BeforeInstallPrompt::new());
        assert!(prompt.should_show());
    }

    #[test]
    fn test_accept_installs_and_persists() {
        let (mut prompt, installs) = prompt(false);
        assert!(prompt.dispatch_if_installable());

        let responder = prompt.show().unwrap();
        assert!(!prompt.should_show());
        assert!(prompt.poll().is_none(), "no answer yet");

        responder.respond(Outcome::Accepted);
        assert_eq!(prompt.poll(), Some(Ok(Outcome::Accepted)));

        assert_eq!(installs.get(), 1);
        assert_eq!(prompt.local.get(INSTALLED_KEY), Some("true"));
        assert!(!prompt.should_show());
        assert!(!prompt.dispatch_if_installable());
    }

    #[test]
    fn test_dismiss_hides_for_the_session_only() {
        let (mut prompt, installs) = prompt(false);
        prompt.dispatch_if_installable();

        prompt.show().unwrap().respond(Outcome::Dismissed);
        assert_eq!(prompt.poll(), Some(Ok(Outcome::Dismissed)));

        assert_eq!(installs.get(), 0);
        assert_eq!(prompt.session.get(DISMISSED_KEY), Some("true"));
        assert_eq!(prompt.local.get(INSTALLED_KEY), None);

        prompt.dispatch_if_installable();
        assert!(!prompt.should_show());
    }

    #[test]
    fn test_prompt_only_once_per_event() {
        let mut event = BeforeInstallPrompt::new();
        let _responder = event.prompt().unwrap();
        assert!(matches!(event.prompt(), Err(InstallError::AlreadyPrompted)));
    }

    #[test]
    fn test_abandoned_prompt_counts_as_dismissed() {
        let (mut prompt, _) = prompt(false);
        prompt.dispatch_if_installable();

        drop(prompt.show().unwrap());
        assert_eq!(prompt.poll(), Some(Ok(Outcome::Dismissed)));
    }

    #[test]
    fn test_failed_install_is_not_persisted() {
        let (mut prompt, _) = prompt(true);
        prompt.dispatch_if_installable();

        prompt.show().unwrap().respond(Outcome::Accepted);
        assert!(matches!(prompt.poll(), Some(Err(InstallError::Target(_)))));
        assert!(!prompt.is_installed());
    }

    #[test]
    fn test_show_without_event() {
        let (mut prompt, _) = prompt(false);
        assert!(matches!(prompt.show(), Err(InstallError::NoDeferredPrompt)));
    }

    #[test]
    fn test_desktop_entry() {
        let launcher = DesktopLauncher::new(PathBuf::from("/tmp/x.desktop"), PathBuf::from("/usr/bin/backroom"));
        let entry = launcher.entry();
        assert!(entry.starts_with("[Desktop Entry]"));
        assert!(entry.contains("Exec=/usr/bin/backroom"));
        assert!(entry.contains("Terminal=true"));
    }
}
