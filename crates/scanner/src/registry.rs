// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named scanners, selected at configuration time.

use crate::error::ScanError;
use crate::rule::{RuleTable, RuleTableConfig};
use crate::scanner::{LogScanner, TableScanner};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lookup table from scanner name to implementation.
#[derive(Clone, Default)]
pub struct ScannerRegistry {
    scanners: BTreeMap<String, Arc<dyn LogScanner>>,
}

impl ScannerRegistry {
    /// Name of the built-in scanner.
    pub const DEFAULT: &'static str = "default";

    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in scanner.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TableScanner::builtin()));
        registry
    }

    /// Add or replace a scanner under its own name.
    pub fn register(&mut self, scanner: Arc<dyn LogScanner>) {
        self.scanners.insert(scanner.name().to_string(), scanner);
    }

    /// Compile and register one table scanner per configured table.
    ///
    /// Nothing is registered if any table fails to compile.
    pub fn register_tables(
        &mut self,
        tables: &BTreeMap<String, RuleTableConfig>,
    ) -> Result<(), ScanError> {
        let compiled = tables
            .iter()
            .map(|(name, config)| {
                RuleTable::compile(config).map(|table| TableScanner::new(name, Arc::new(table)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for scanner in compiled {
            tracing::debug!(
                name = scanner.name(),
                rules = scanner.table().len(),
                "registered scanner"
            );
            self.register(Arc::new(scanner));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn LogScanner>, ScanError> {
        self.scanners.get(name).cloned().ok_or_else(|| ScanError::UnknownScanner {
            name: name.to_string(),
            known: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scanners.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
