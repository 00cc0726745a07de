use crate::models::CredentialEntry;
use crate::store::EntryStore;

/// Live search term, trimmed and lowercased. Empty means no filter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchState {
    raw: String,
    term: String,
}

impl SearchState {
    pub fn set(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
        self.term = self.raw.trim().to_lowercase();
    }

    pub fn push(&mut self, c: char) {
        let mut raw = std::mem::take(&mut self.raw);
        raw.push(c);
        self.set(raw);
    }

    pub fn pop(&mut self) {
        let mut raw = std::mem::take(&mut self.raw);
        raw.pop();
        self.set(raw);
    }

    pub fn clear(&mut self) {
        self.set(String::new());
    }

    /// What the user typed, for the search box.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

/// Entries matching `term`, in store order. The haystack covers every field
/// including the password, so a remembered fragment of a secret finds it.
pub fn visible<'a>(store: &'a EntryStore, term: &str) -> Vec<&'a CredentialEntry> {
    store
        .entries()
        .iter()
        .filter(|entry| matches(entry, term))
        .collect()
}

/// Whether `entry` belongs in the visible set for an already-normalized term.
pub fn matches(entry: &CredentialEntry, term: &str) -> bool {
    term.is_empty() || haystack(entry).contains(term)
}

fn haystack(entry: &CredentialEntry) -> String {
    [
        entry.website.as_str(),
        entry.username.as_deref().unwrap_or(""),
        entry.password.as_str(),
        entry.notes.as_deref().unwrap_or(""),
    ]
    .join(" ")
    .to_lowercase()
}
