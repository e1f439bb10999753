// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kv_core::BuildPhase;
use thiserror::Error;

/// Errors from building rule tables or looking up scanners
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("transition marker {pattern:?} cannot enter the {phase} phase")]
    InvalidTransition { pattern: String, phase: BuildPhase },
    #[error("unknown scanner {name:?} (known: {known})")]
    UnknownScanner { name: String, known: String },
    #[error("invalid rule table: {0}")]
    Toml(#[from] toml::de::Error),
}
