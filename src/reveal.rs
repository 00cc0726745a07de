use std::collections::HashSet;

use crate::models::EntryId;

pub const SECRET_MASK: &str = "••••••••";

/// Ids whose password is currently shown in plaintext.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevealState {
    revealed: HashSet<EntryId>,
}

impl RevealState {
    /// Flips `id` and returns whether it is now revealed.
    pub fn toggle(&mut self, id: &EntryId) -> bool {
        if self.revealed.remove(id) {
            false
        } else {
            self.revealed.insert(id.clone());
            true
        }
    }

    pub fn is_revealed(&self, id: &EntryId) -> bool {
        self.revealed.contains(id)
    }

    pub fn forget(&mut self, id: &EntryId) {
        self.revealed.remove(id);
    }

    pub fn clear(&mut self) {
        self.revealed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }
}

/// Text shown in place of a password.
pub fn secret_display<'a>(revealed: bool, secret: &'a str) -> &'a str {
    if revealed { secret } else { SECRET_MASK }
}

pub fn toggle_label(revealed: bool) -> &'static str {
    if revealed { "Hide" } else { "Show" }
}
