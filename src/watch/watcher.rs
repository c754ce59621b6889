// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Events sent from the watcher (and Ctrl-C handler) into the re-sort loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The manifest was written, replaced or removed.
    ManifestChanged,
    ShutdownRequested,
}

/// Handle for the manifest watcher.
///
/// Dropping this handle will stop watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `manifest` and send [`WatchEvent::ManifestChanged`] whenever it
/// changes.
///
/// The parent directory is watched (non-recursively) rather than the file
/// itself, so editors that save by replacing the file are still noticed.
pub fn spawn_manifest_watcher(
    manifest: impl Into<PathBuf>,
    tx: mpsc::Sender<WatchEvent>,
) -> Result<WatcherHandle> {
    let manifest = manifest.into();
    let manifest = manifest.canonicalize().unwrap_or(manifest);
    let dir = match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("orderdag: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("orderdag: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!("watching manifest {:?}", manifest);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            if !is_manifest_event(&event, &manifest) {
                continue;
            }
            if tx.send(WatchEvent::ManifestChanged).await.is_err() {
                break;
            }
        }
        debug!("manifest watcher loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Whether `event` is a content change touching `manifest`.
pub fn is_manifest_event(event: &Event, manifest: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    let Some(name) = manifest.file_name() else {
        return false;
    };
    event.paths.iter().any(|p| p == manifest || p.file_name() == Some(name))
}
