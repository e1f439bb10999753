// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("scan")
        .stdout_has("escalate")
        .stdout_has("record");
}

#[test]
fn escalate_help_shows_flags() {
    cli()
        .args(&["escalate", "--help"])
        .passes()
        .stdout_has("--dry-run")
        .stdout_has("--no-record")
        .stdout_has("--job");
}

#[test]
fn db_help_shows_subcommands() {
    cli().args(&["db", "--help"]).passes().stdout_has("list").stdout_has("log").stdout_has("scan");
}

#[test]
fn version_is_printed() {
    cli().args(&["--version"]).passes().stdout_has("kvetch 0.2");
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    cli().fails().code_is(2);
}
