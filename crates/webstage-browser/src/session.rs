//! Lifecycle of the one browser/context/page triple.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cdp::{CdpClient, CdpError, Page};

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The browser could not be launched or connected to. Reported as a
    /// service-unavailable outcome, never a crash.
    #[error("Browser unavailable: {0}")]
    Unavailable(String),

    /// A CDP operation on an established session failed.
    #[error(transparent)]
    Cdp(#[from] CdpError),
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Explicit Chrome executable; discovered per-OS when unset.
    pub chrome_path: Option<PathBuf>,
    /// Headless mode (the default; headed is a debugging aid).
    pub headless: bool,
    /// Viewport width.
    pub viewport_width: u32,
    /// Viewport height.
    pub viewport_height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            chrome_path: None,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

impl SessionConfig {
    /// The CDP discovery endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}

struct ActiveSession {
    context_id: String,
    page: Arc<Page>,
}

/// Owns the single browser session: lazy launch, context reset, shutdown.
///
/// Exactly one session exists per process; there is no per-request
/// isolation. State lives in the browser context, so `reset` is the only
/// way cookies, storage, and workers are cleared.
pub struct SessionManager {
    config: SessionConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    chrome: Mutex<Option<Child>>,
    /// Per-run profile directory; deleted when the session shuts down.
    profile_dir: Mutex<Option<tempfile::TempDir>>,
    active: RwLock<Option<ActiveSession>>,
}

impl SessionManager {
    /// Create a manager. Nothing is launched here; the browser comes up
    /// lazily on the first action that needs it.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome: Mutex::new(None),
            profile_dir: Mutex::new(None),
            active: RwLock::new(None),
        }
    }

    /// Find a Chrome executable.
    pub fn find_chrome(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config.chrome_path {
            return path.exists().then(|| path.clone());
        }

        #[cfg(target_os = "macos")]
        let candidates = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let candidates = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let candidates = [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let candidates: [&str; 0] = [];

        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Whether something is already listening on the debug endpoint.
    async fn is_running(&self) -> bool {
        reqwest::get(format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    async fn launch_chrome(&self) -> Result<Child, SessionError> {
        let chrome = self.find_chrome().ok_or_else(|| {
            SessionError::Unavailable(
                "Chrome executable not found; install Chrome or pass --chrome-path".to_string(),
            )
        })?;

        let profile = tempfile::tempdir().map_err(|e| {
            SessionError::Unavailable(format!("failed to create profile directory: {}", e))
        })?;

        info!("launching {} (headless: {})", chrome.display(), self.config.headless);

        let mut cmd = Command::new(&chrome);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .arg(format!(
                "--window-size={},{}",
                self.config.viewport_width, self.config.viewport_height
            ))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| SessionError::Unavailable(format!("failed to launch Chrome: {}", e)))?;

        *self.profile_dir.lock().await = Some(profile);
        info!("Chrome launched with PID {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it first if nothing answers on
    /// the debug port.
    async fn connect(&self) -> Result<Arc<CdpClient>, SessionError> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(client.clone());
        }

        if !self.is_running().await {
            let child = self.launch_chrome().await?;
            *self.chrome.lock().await = Some(child);

            let mut attempts = 0;
            while attempts < 30 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                if self.is_running().await {
                    break;
                }
                attempts += 1;
            }
            if attempts >= 30 {
                return Err(SessionError::Unavailable(
                    "Chrome did not start accepting connections within timeout".to_string(),
                ));
            }
        }

        let client = CdpClient::connect(&self.config.endpoint())
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        let client = Arc::new(client);

        let mut guard = self.client.write().await;
        if let Some(existing) = guard.as_ref() {
            return Ok(existing.clone());
        }
        *guard = Some(client.clone());
        info!("connected to browser at {}", self.config.endpoint());
        Ok(client)
    }

    /// The current page, lazily creating the whole session when absent.
    pub async fn ensure(&self) -> Result<Arc<Page>, SessionError> {
        if let Some(active) = self.active.read().await.as_ref() {
            return Ok(active.page.clone());
        }

        let client = self.connect().await?;
        let mut guard = self.active.write().await;
        if let Some(active) = guard.as_ref() {
            return Ok(active.page.clone());
        }

        let context_id = client.create_browser_context().await?;
        let page = Arc::new(client.create_page(&context_id).await?);
        debug!("opened page {} in context {}", page.target_id(), context_id);
        *guard = Some(ActiveSession {
            context_id,
            page: page.clone(),
        });
        Ok(page)
    }

    /// Dispose the current context (wiping cookies, storage, and workers)
    /// and open a fresh context + page. The old page must not be reused.
    pub async fn reset(&self) -> Result<(), SessionError> {
        let client = self.connect().await?;
        let mut guard = self.active.write().await;

        if let Some(old) = guard.take() {
            if let Err(e) = client.dispose_browser_context(&old.context_id).await {
                warn!("failed to dispose old browser context: {}", e);
            }
        }

        let context_id = client.create_browser_context().await?;
        let page = Arc::new(client.create_page(&context_id).await?);
        info!("session reset, new context {}", context_id);
        *guard = Some(ActiveSession {
            context_id,
            page,
        });
        Ok(())
    }

    /// Orderly teardown, invoked only from process-termination handling.
    pub async fn shutdown(&self) {
        let client = self.client.write().await.take();
        let active = self.active.write().await.take();

        if let (Some(client), Some(active)) = (client.as_ref(), active) {
            let _ = client.dispose_browser_context(&active.context_id).await;
        }
        drop(client);

        if let Some(mut child) = self.chrome.lock().await.take() {
            let _ = child.kill().await;
        }
        let _ = self.profile_dir.lock().await.take();
        info!("browser session shut down");
    }

    /// Liveness probe: a session with an open page exists.
    pub async fn is_available(&self) -> bool {
        self.active.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.debug_port, 9222);
        assert!(config.headless);
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 720);
    }

    #[test]
    fn test_config_endpoint() {
        let config = SessionConfig::default();
        assert_eq!(config.endpoint(), "http://127.0.0.1:9222");
    }

    #[tokio::test]
    async fn test_not_available_before_first_action() {
        let manager = SessionManager::new(SessionConfig::default());
        assert!(!manager.is_available().await);
    }

    #[tokio::test]
    async fn test_shutdown_without_session_is_harmless() {
        let manager = SessionManager::new(SessionConfig::default());
        manager.shutdown().await;
        assert!(!manager.is_available().await);
    }

    #[test]
    fn test_explicit_chrome_path_must_exist() {
        let manager = SessionManager::new(SessionConfig {
            chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
            ..SessionConfig::default()
        });
        assert!(manager.find_chrome().is_none());
    }
}
