use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::SystemTime;
use tokio::sync::mpsc as tokio_mpsc;

use super::{LayoutEvent, PageLayout};

/// Watches a layout file and ships the re-parsed document on every change.
///
/// This is the playground's stand-in for page resize and layout-shift
/// signals: editing the file while the app runs moves the obstacles live.
pub struct LayoutWatcher {
    _watcher: RecommendedWatcher,
}

impl LayoutWatcher {
    pub fn new(
        path: impl AsRef<Path>,
        event_tx: tokio_mpsc::Sender<LayoutEvent>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let file_path = path.as_ref().to_path_buf();

        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&file_path, RecursiveMode::NonRecursive)?;

        // Forwarding task: reload on notify events, with a periodic mtime
        // check as fallback for editors that replace the file
        let watch_path = file_path.clone();
        let mut last_modified = modified_time(&watch_path);

        tokio::spawn(async move {
            loop {
                let changed = match rx.recv_timeout(std::time::Duration::from_millis(200)) {
                    Ok(_event) => true,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let current = modified_time(&watch_path);
                        let stale = current != last_modified;
                        if stale {
                            last_modified = current;
                        }
                        stale
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => return,
                };

                if !changed {
                    continue;
                }
                last_modified = modified_time(&watch_path);

                match PageLayout::load(&watch_path) {
                    Ok(layout) => {
                        if event_tx.send(LayoutEvent::Reloaded(layout)).await.is_err() {
                            return; // channel closed, app is gone
                        }
                    }
                    Err(e) => {
                        // Mid-save truncation or a typo; keep the old layout
                        eprintln!("Failed to reload layout: {}", e);
                    }
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
