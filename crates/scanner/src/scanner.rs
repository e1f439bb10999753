// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scanning capability and its table-driven implementation.

use crate::rule::RuleTable;
use crate::scan::{Scan, ScanResult};
use std::io::BufRead;
use std::sync::Arc;

/// An in-progress scan of one transcript.
pub trait ScanSession {
    fn feed(&mut self, line: &str);
    fn finish(self: Box<Self>) -> ScanResult;
}

impl ScanSession for Scan<'_> {
    fn feed(&mut self, line: &str) {
        Scan::feed(self, line);
    }

    fn finish(self: Box<Self>) -> ScanResult {
        Scan::finish(*self)
    }
}

/// Something that can turn a transcript into a [`ScanResult`].
pub trait LogScanner: Send + Sync {
    /// Registry key for this scanner
    fn name(&self) -> &str;

    /// Start a fresh scan.
    fn begin(&self) -> Box<dyn ScanSession + '_>;

    /// Scan a sequence of lines in one pass.
    fn scan(&self, lines: &mut dyn Iterator<Item = &str>) -> ScanResult {
        let mut session = self.begin();
        for line in lines {
            session.feed(line);
        }
        session.finish()
    }

    fn scan_text(&self, text: &str) -> ScanResult {
        self.scan(&mut text.lines())
    }
}

/// Scanner driven by a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct TableScanner {
    name: String,
    table: Arc<RuleTable>,
}

impl TableScanner {
    pub fn new(name: impl Into<String>, table: Arc<RuleTable>) -> Self {
        Self { name: name.into(), table }
    }

    /// The built-in table registered as `default`.
    pub fn builtin() -> Self {
        Self::new(crate::ScannerRegistry::DEFAULT, RuleTable::builtin())
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

impl LogScanner for TableScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&self) -> Box<dyn ScanSession + '_> {
        Box::new(Scan::new(&self.table))
    }
}

/// Scan a transcript straight from a reader, one line at a time.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; only
/// read errors end the scan early.
pub fn scan_reader<R: BufRead>(
    scanner: &dyn LogScanner,
    mut reader: R,
) -> std::io::Result<ScanResult> {
    let mut session = scanner.begin();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        session.feed(line.trim_end_matches(['\n', '\r']));
    }
    Ok(session.finish())
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
