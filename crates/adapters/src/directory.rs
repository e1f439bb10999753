// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Who reports to whom, and how to reach them.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{0} is not in the org chart")]
    UnknownPerson(String),
    #[error("{0} has no manager")]
    NoManager(String),
    #[error("no contact address for {0}")]
    NoContact(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid org chart {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Org-chart lookups used to widen an escalation.
pub trait Directory: Send + Sync {
    /// Identity of `person`'s manager.
    fn manager_of(&self, person: &str) -> Result<String, DirectoryError>;

    /// Address to notify for `identity`.
    fn contact_of(&self, identity: &str) -> Result<String, DirectoryError>;
}

/// One node of the nested org chart file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub lead: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// Directory built from a nested team tree.
///
/// Members report to their team's lead; a sub-team's lead reports to the
/// lead of the enclosing team.
#[derive(Debug, Clone, Default)]
pub struct OrgChart {
    managers: HashMap<String, String>,
    reports: BTreeMap<String, Vec<String>>,
    email_domain: Option<String>,
    contacts: BTreeMap<String, String>,
}

impl OrgChart {
    pub fn new(root: &Team) -> Self {
        let mut chart = Self::default();
        chart.add_team(root, None);
        chart
    }

    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| DirectoryError::Io { path: path.to_path_buf(), source })?;
        let root: Team = serde_json::from_str(&text)
            .map_err(|source| DirectoryError::Json { path: path.to_path_buf(), source })?;
        let chart = Self::new(&root);
        tracing::debug!(path = %path.display(), people = chart.managers.len(), "loaded org chart");
        Ok(chart)
    }

    /// Domain appended to bare identities that have no explicit contact.
    pub fn email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = Some(domain.into());
        self
    }

    pub fn contacts(mut self, contacts: BTreeMap<String, String>) -> Self {
        self.contacts.extend(contacts);
        self
    }

    /// Direct reports of `lead`, in chart order.
    pub fn members_of(&self, lead: &str) -> &[String] {
        self.reports.get(lead).map(Vec::as_slice).unwrap_or_default()
    }

    fn is_known(&self, person: &str) -> bool {
        self.managers.contains_key(person) || self.reports.contains_key(person)
    }

    fn add_team(&mut self, team: &Team, parent_lead: Option<&str>) {
        let lead = team.lead.as_deref();
        if let Some(lead) = lead {
            self.reports.entry(lead.to_string()).or_default();
            if let Some(parent) = parent_lead {
                self.report(lead, parent);
            }
        }
        for member in &team.members {
            match lead {
                Some(lead) => self.report(member, lead),
                None => {
                    self.reports.entry(member.clone()).or_default();
                }
            }
        }
        for sub in &team.teams {
            self.add_team(sub, lead.or(parent_lead));
        }
    }

    fn report(&mut self, person: &str, lead: &str) {
        self.managers.insert(person.to_string(), lead.to_string());
        self.reports.entry(lead.to_string()).or_default().push(person.to_string());
    }
}

impl Directory for OrgChart {
    fn manager_of(&self, person: &str) -> Result<String, DirectoryError> {
        match self.managers.get(person) {
            Some(manager) => Ok(manager.clone()),
            None if self.is_known(person) => Err(DirectoryError::NoManager(person.to_string())),
            None => Err(DirectoryError::UnknownPerson(person.to_string())),
        }
    }

    fn contact_of(&self, identity: &str) -> Result<String, DirectoryError> {
        if let Some(address) = self.contacts.get(identity) {
            return Ok(address.clone());
        }
        if identity.contains('@') {
            return Ok(identity.to_string());
        }
        match &self.email_domain {
            Some(domain) => Ok(format!("{identity}@{domain}")),
            None => Err(DirectoryError::NoContact(identity.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
