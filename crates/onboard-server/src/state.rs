use onboard_core::config::Config;
use onboard_core::theme::UiSettings;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Shared application state passed to all route handlers.
///
/// `ui` is the single owner of presentation settings: it is read from
/// `.onboard/config.yaml` once at startup and only replaced through
/// `PUT /api/theme`, which also persists the change.
///
/// Handlers that write user or stage records hold `write_lock` from load to
/// save so concurrent requests cannot interleave.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub event_tx: broadcast::Sender<()>,
    pub ui: Arc<RwLock<UiSettings>>,
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let ui = match Config::load(&root) {
            Ok(cfg) => cfg.ui,
            Err(e) => {
                tracing::warn!("using default ui settings: {e}");
                UiSettings::default()
            }
        };
        let (tx, _) = broadcast::channel(64);
        Self {
            root,
            event_tx: tx,
            ui: Arc::new(RwLock::new(ui)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Tell SSE subscribers that stored state changed.
    pub fn notify(&self) {
        // No subscribers is not an error.
        let _ = self.event_tx.send(());
    }
}
