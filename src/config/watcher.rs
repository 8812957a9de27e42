//! Hot reload of the gallery configuration file

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Quiet period after the last write before the file is re-read
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches the config file and yields each successfully reloaded config
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by writing a temp file and renaming it over the original are
/// still seen. A burst of events schedules a single reload. Reloads that fail
/// to parse or validate are logged and dropped; the host keeps running with
/// the previous config.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

/// State shared between the notify thread and the reload tasks
struct ReloadTrigger {
    path: PathBuf,
    file_name: Option<std::ffi::OsString>,
    pending: AtomicBool,
    tx: mpsc::Sender<AppConfig>,
    runtime: tokio::runtime::Handle,
}

impl ReloadTrigger {
    fn concerns(&self, event: &Event) -> bool {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == self.file_name.as_deref())
    }

    fn schedule(self: &Arc<Self>) {
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        let trigger = Arc::clone(self);
        self.runtime.spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            trigger.pending.store(false, Ordering::Release);

            let path = trigger.path.to_string_lossy().into_owned();
            match AppConfig::load(&path).await {
                Ok(config) => {
                    info!("🔄 Configuration reloaded from {}", path);
                    if trigger.tx.send(config).await.is_err() {
                        debug!("Config receiver gone, dropping reload");
                    }
                }
                Err(e) => warn!("Ignoring invalid config change in {}: {:#}", path, e),
            }
        });
    }
}

impl ConfigWatcher {
    /// Load the initial config and start watching `config_path`
    pub async fn new(config_path: String) -> Result<(Self, Arc<AppConfig>)> {
        let initial = AppConfig::load(&config_path)
            .await
            .with_context(|| format!("Failed to load initial config from {}", config_path))?;

        let path = PathBuf::from(&config_path);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel(4);
        let trigger = Arc::new(ReloadTrigger {
            file_name: path.file_name().map(|n| n.to_os_string()),
            path,
            pending: AtomicBool::new(false),
            tx,
            // notify calls back on its own thread, outside the runtime
            runtime: tokio::runtime::Handle::current(),
        });

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if trigger.concerns(&event) => trigger.schedule(),
            Ok(_) => {}
            Err(e) => error!("Config watch error: {}", e),
        })?;

        watcher
            .watch(Path::new(&dir), RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory {}", dir.display()))?;

        info!("👀 Watching {} for changes", config_path);

        Ok((Self { _watcher: watcher, rx }, Arc::new(initial)))
    }

    /// Next successfully reloaded config, or None once the watcher is gone
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}
