// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations.

fn format_elapsed(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s => format!("{}d", s / 86_400),
    }
}

/// Format an elapsed span compactly (e.g., "5s", "2m", "1h", "3d").
pub fn format_elapsed_ms(ms: u64) -> String {
    format_elapsed(ms / 1000)
}

/// Format a build duration as `H:MM:SS`, prefixed by whole days when needed
/// (e.g., "0:04:10", "2 days, 3:00:05").
pub fn format_duration_ms(ms: u64) -> String {
    let total = ms / 1000;
    let days = total / 86_400;
    let clock =
        format!("{}:{:02}:{:02}", (total % 86_400) / 3_600, (total % 3_600) / 60, total % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        d => format!("{} days, {}", d, clock),
    }
}
