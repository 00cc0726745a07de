use std::collections::HashSet;

use tracing::warn;

use crate::models::{CredentialEntry, EntryId};

/// Last confirmed server snapshot of the credential list, in server order.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<CredentialEntry>,
}

impl EntryStore {
    pub fn entries(&self) -> &[CredentialEntry] {
        &self.entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&CredentialEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swaps in a fresh server snapshot. Duplicate ids keep their first
    /// occurrence. The previous snapshot's secrets are wiped.
    pub(crate) fn replace(&mut self, incoming: Vec<CredentialEntry>) {
        let mut seen = HashSet::with_capacity(incoming.len());
        let mut next = Vec::with_capacity(incoming.len());
        for mut entry in incoming {
            if seen.insert(entry.id.clone()) {
                next.push(entry);
            } else {
                warn!(id = %entry.id, "dropping duplicate entry id from server response");
                entry.wipe();
            }
        }
        let mut old = std::mem::replace(&mut self.entries, next);
        for entry in &mut old {
            entry.wipe();
        }
    }
}

impl Drop for EntryStore {
    fn drop(&mut self) {
        for entry in &mut self.entries {
            entry.wipe();
        }
    }
}

#[cfg(test)]
pub(crate) fn entry(id: &str, website: &str, password: &str) -> CredentialEntry {
    CredentialEntry {
        id: EntryId::from(id),
        website: website.to_string(),
        username: None,
        password: password.to_string(),
        notes: None,
        created_at: None,
    }
}
