// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod db;
mod escalate;
mod help;
mod scan;
