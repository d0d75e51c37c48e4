//! CLI command implementations

pub mod callback;
pub mod clear;
pub mod connect;
pub mod status;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use appconnect_lib::{
    AppConnect, AppConnectConfig, Browser, CallbackParams, FileStorage, NamespaceKind, Navigator,
    WindowTarget,
};
use async_trait::async_trait;

/// Where sessions are stored and which namespace a command works on.
pub struct Scope {
    pub storage_dir: PathBuf,
    pub target: String,
    pub namespace: NamespaceKind,
}

impl Scope {
    /// Path of the session store file
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir.join("sessions.json")
    }

    /// Build the orchestrator for this scope with terminal collaborators.
    pub fn open(&self, open_in_new_tab: bool) -> Result<Terminal> {
        let storage = FileStorage::new(self.storage_path()).with_context(|| {
            format!("Failed to open session store in {}", self.storage_dir.display())
        })?;

        let config = AppConnectConfig {
            identifier: self.target.clone(),
            namespace: self.namespace,
            open_in_new_tab,
        };

        let browser = Arc::new(TerminalBrowser::default());
        let navigator = Arc::new(TerminalNavigator::default());
        let connect = AppConnect::from_config(
            &config,
            Arc::new(storage),
            browser.clone(),
            navigator.clone(),
        )?;

        Ok(Terminal {
            connect,
            browser,
            navigator,
        })
    }
}

/// An orchestrator plus the terminal stand-ins it drives.
pub struct Terminal {
    pub connect: AppConnect<CallbackParams>,
    pub browser: Arc<TerminalBrowser>,
    pub navigator: Arc<TerminalNavigator>,
}

/// "Opens" URLs by remembering them for the command to print.
#[derive(Default)]
pub struct TerminalBrowser {
    opened: Mutex<Option<(String, WindowTarget)>>,
    dismissed: AtomicBool,
}

impl TerminalBrowser {
    pub fn opened(&self) -> Option<(String, WindowTarget)> {
        self.opened.lock().ok().and_then(|o| o.clone())
    }

    pub fn dismissed(&self) -> bool {
        self.dismissed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for TerminalBrowser {
    async fn open(&self, url: &str, target: WindowTarget) -> appconnect_lib::Result<()> {
        tracing::debug!(%url, %target, "terminal browser open");
        if let Ok(mut opened) = self.opened.lock() {
            *opened = Some((url.to_string(), target));
        }
        Ok(())
    }

    async fn dismiss(&self) -> appconnect_lib::Result<()> {
        self.dismissed.store(true, Ordering::SeqCst);
        Ok(())
    }

    // The user opens the printed link wherever they like.
    fn supports_new_tab(&self) -> bool {
        true
    }
}

/// Records the route the app would navigate to.
#[derive(Default)]
pub struct TerminalNavigator {
    replaced: Mutex<Option<String>>,
}

impl TerminalNavigator {
    pub fn replaced(&self) -> Option<String> {
        self.replaced.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl Navigator for TerminalNavigator {
    async fn replace(&self, path: &str) -> appconnect_lib::Result<()> {
        if let Ok(mut replaced) = self.replaced.lock() {
            *replaced = Some(path.to_string());
        }
        Ok(())
    }
}
