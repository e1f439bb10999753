// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logical phases of a build transcript.

use serde::{Deserialize, Serialize};

/// Phase of a build as observed in its console transcript.
///
/// Declaration order is the order phases occur in; the derived `Ord`
/// is what keeps transitions one-directional. `Summary` is synthetic and
/// only ever holds the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    Prologue,
    CheckOut,
    Build,
    Test,
    Epilogue,
    Summary,
}

crate::simple_display! {
    BuildPhase {
        Prologue => "Prologue",
        CheckOut => "CheckOut",
        Build => "Build",
        Test => "Test",
        Epilogue => "Epilogue",
        Summary => "Summary",
    }
}

impl BuildPhase {
    /// Phases that accumulate failure lines, in report order.
    pub const REPORTED: [BuildPhase; 5] = [
        BuildPhase::Prologue,
        BuildPhase::CheckOut,
        BuildPhase::Build,
        BuildPhase::Test,
        BuildPhase::Epilogue,
    ];

    /// Returns the phase a transition to `next` leads to.
    ///
    /// Phases are never re-entered: a marker for the current or an earlier
    /// phase leaves the phase unchanged.
    pub fn advance(self, next: BuildPhase) -> BuildPhase {
        self.max(next)
    }

    pub fn is_reported(self) -> bool {
        self != BuildPhase::Summary
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
