//! Browser control.
//!
//! The companion app is opened in an external browser view. On web hosts
//! the caller may ask for a new tab; everywhere else the view replaces the
//! current window.

use async_trait::async_trait;

use crate::Result;

/// Options for opening the companion app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Open in a new tab when the host supports it.
    pub in_new_tab: bool,
}

impl OpenOptions {
    pub fn new_tab() -> Self {
        Self { in_new_tab: true }
    }
}

/// Window the browser view is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTarget {
    /// Replace the current window (`_self`).
    SelfTarget,
    /// A new tab or window (`_blank`).
    Blank,
}

impl WindowTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowTarget::SelfTarget => "_self",
            WindowTarget::Blank => "_blank",
        }
    }
}

impl std::fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host browser integration.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open `url` in the given window.
    async fn open(&self, url: &str, target: WindowTarget) -> Result<()>;

    /// Close any browser view previously opened by [`Browser::open`].
    async fn dismiss(&self) -> Result<()>;

    /// Whether the host can open a new tab (true on web).
    fn supports_new_tab(&self) -> bool {
        false
    }
}

/// Open `url`, in a new tab only if requested and supported by the host.
pub async fn open_browser(browser: &dyn Browser, url: &str, options: OpenOptions) -> Result<()> {
    let target = if options.in_new_tab && browser.supports_new_tab() {
        WindowTarget::Blank
    } else {
        WindowTarget::SelfTarget
    };
    browser.open(url, target).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        web: bool,
        opened: Mutex<Vec<(String, WindowTarget)>>,
    }

    #[async_trait]
    impl Browser for Recorder {
        async fn open(&self, url: &str, target: WindowTarget) -> Result<()> {
            self.opened.lock().unwrap().push((url.to_string(), target));
            Ok(())
        }

        async fn dismiss(&self) -> Result<()> {
            Ok(())
        }

        fn supports_new_tab(&self) -> bool {
            self.web
        }
    }

    fn recorder(web: bool) -> Recorder {
        Recorder {
            web,
            opened: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn new_tab_only_on_web() {
        let web = recorder(true);
        open_browser(&web, "https://a", OpenOptions::new_tab()).await.unwrap();
        open_browser(&web, "https://b", OpenOptions::default()).await.unwrap();

        let native = recorder(false);
        open_browser(&native, "https://c", OpenOptions::new_tab()).await.unwrap();

        assert_eq!(
            *web.opened.lock().unwrap(),
            vec![
                ("https://a".to_string(), WindowTarget::Blank),
                ("https://b".to_string(), WindowTarget::SelfTarget),
            ]
        );
        assert_eq!(
            *native.opened.lock().unwrap(),
            vec![("https://c".to_string(), WindowTarget::SelfTarget)]
        );
    }

    #[test]
    fn window_names() {
        assert_eq!(WindowTarget::SelfTarget.to_string(), "_self");
        assert_eq!(WindowTarget::Blank.as_str(), "_blank");
    }
}
