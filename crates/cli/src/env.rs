// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// Filter directives for the log subscriber.
pub const LOG_ENV: &str = "KVETCH_LOG";

/// Resolve state directory: KVETCH_STATE_DIR > XDG_STATE_HOME/kvetch > ~/.local/state/kvetch
pub fn state_dir() -> Option<PathBuf> {
    if let Some(dir) = non_empty("KVETCH_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("kvetch"));
    }
    non_empty("HOME").map(|home| PathBuf::from(home).join(".local/state/kvetch"))
}

/// Resolve config file: KVETCH_CONFIG > XDG_CONFIG_HOME/kvetch > ~/.config/kvetch
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty("KVETCH_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let dir = match non_empty("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(non_empty("HOME")?).join(".config"),
    };
    Some(dir.join("kvetch/kvetch.toml"))
}

/// Root of the exported build tree
pub fn source_dir() -> Option<PathBuf> {
    non_empty("KVETCH_SOURCE_DIR").map(PathBuf::from)
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}
