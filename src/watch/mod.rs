// src/watch/mod.rs

//! Manifest watching.
//!
//! Turns filesystem changes to the manifest into [`WatchEvent`]s so the CLI
//! can reload it, invalidate memoized orders and sort again.

pub mod watcher;

pub use watcher::{is_manifest_event, spawn_manifest_watcher, WatchEvent, WatcherHandle};
