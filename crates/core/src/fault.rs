// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coarse fault attribution for a failed build.

use serde::{Deserialize, Serialize};

/// Who is most likely responsible for a failure.
///
/// Variants are ordered by precedence: when signals of several kinds are
/// seen in one transcript the greatest one wins, so infrastructure
/// problems mask the compiler errors they tend to cause.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    #[default]
    Unknown,
    Developer,
    System,
}

crate::simple_display! {
    FaultKind {
        Unknown => "unknown",
        Developer => "developer",
        System => "system",
    }
}

impl FaultKind {
    /// Combine two verdicts, keeping the higher-precedence one.
    pub fn escalate(self, other: FaultKind) -> FaultKind {
        self.max(other)
    }

    pub fn is_system(self) -> bool {
        self == FaultKind::System
    }
}
