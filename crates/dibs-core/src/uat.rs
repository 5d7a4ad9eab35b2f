//! UAT ownership registry.
//!
//! A UAT is held by at most one user at a time. A missing holder is stored
//! as the empty string, so every known UAT always has an entry and unknown
//! names are never silently created.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ownership table for the fixed UAT pool.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UatOwners {
    owners: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrabOutcome {
    Grabbed,
    AlreadyYours,
    HeldBy(String),
    UnknownUat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    NotInUse,
    HeldBy(String),
    UnknownUat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StealOutcome {
    Stolen,
    UnknownUat,
}

impl UatOwners {
    /// Insert free entries for any configured names missing from the table.
    ///
    /// Existing entries are left untouched, including holders of names that
    /// are no longer configured. Returns how many entries were added.
    pub fn seed(&mut self, names: &[String]) -> usize {
        let mut added = 0;
        for name in names {
            if !self.owners.contains_key(name) {
                self.owners.insert(name.clone(), String::new());
                added += 1;
            }
        }
        added
    }

    pub fn holder(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    pub fn grab(&mut self, name: &str, user: &str) -> GrabOutcome {
        match self.owners.get_mut(name) {
            None => GrabOutcome::UnknownUat,
            Some(holder) if holder.is_empty() => {
                *holder = user.to_string();
                GrabOutcome::Grabbed
            }
            Some(holder) if holder == user => GrabOutcome::AlreadyYours,
            Some(holder) => GrabOutcome::HeldBy(holder.clone()),
        }
    }

    pub fn release(&mut self, name: &str, user: &str) -> ReleaseOutcome {
        match self.owners.get_mut(name) {
            None => ReleaseOutcome::UnknownUat,
            Some(holder) if holder.is_empty() => ReleaseOutcome::NotInUse,
            Some(holder) if holder == user => {
                holder.clear();
                ReleaseOutcome::Released
            }
            Some(holder) => ReleaseOutcome::HeldBy(holder.clone()),
        }
    }

    pub fn steal(&mut self, name: &str, user: &str) -> StealOutcome {
        match self.owners.get_mut(name) {
            None => StealOutcome::UnknownUat,
            Some(holder) => {
                *holder = user.to_string();
                StealOutcome::Stolen
            }
        }
    }

    /// One `name: holder` line per known queried name, in query order.
    /// Unknown names are skipped.
    pub fn status_lines<'a>(&self, queries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        queries
            .into_iter()
            .filter_map(|name| self.owners.get(name).map(|holder| format!("{name}: {holder}")))
            .collect()
    }
}
