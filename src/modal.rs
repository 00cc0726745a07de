//! Add/edit form lifecycle.

use zeroize::Zeroize;

use crate::error::DashboardError;
use crate::models::{EntryFields, EntryId};
use crate::store::EntryStore;
use crate::strength::{self, Strength};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Website and password are required";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Adding,
    Editing(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Website,
    Username,
    Password,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Website,
        FormField::Username,
        FormField::Password,
        FormField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Website => "Website (required)",
            FormField::Username => "Username (optional)",
            FormField::Password => "Password (required)",
            FormField::Notes => "Notes (optional)",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Website => FormField::Username,
            FormField::Username => FormField::Password,
            FormField::Password => FormField::Notes,
            FormField::Notes => FormField::Website,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Website => FormField::Notes,
            FormField::Username => FormField::Website,
            FormField::Password => FormField::Username,
            FormField::Notes => FormField::Password,
        }
    }
}

/// What a valid submit asks the sync layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(EntryFields),
    Update { id: EntryId, fields: EntryFields },
}

#[derive(Debug, Default)]
pub struct ModalSession {
    state: ModalState,
    fields: EntryFields,
    focus: FormField,
    strength: Strength,
    show_password: bool,
    error: Option<String>,
}

impl ModalSession {
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn fields(&self) -> &EntryFields {
        &self.fields
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    pub fn password_visible(&self) -> bool {
        self.show_password
    }

    /// Inline error from the last failed submit, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        match self.state {
            ModalState::Editing(_) => "Edit Password",
            _ => "Add Password",
        }
    }

    pub fn open_add(&mut self) {
        self.reset();
        self.state = ModalState::Adding;
    }

    /// Seeds the form from a snapshot of the stored entry.
    pub fn open_edit(&mut self, id: &EntryId, store: &EntryStore) -> Result<(), DashboardError> {
        let entry = store
            .get(id)
            .ok_or_else(|| DashboardError::NotFoundLocally { id: id.clone() })?;
        self.reset();
        self.fields = EntryFields::from(entry);
        self.strength = strength::evaluate(&self.fields.password);
        self.state = ModalState::Editing(id.clone());
        Ok(())
    }

    pub fn close(&mut self) {
        self.reset();
        self.state = ModalState::Closed;
    }

    /// Validates locally and, if the form is complete, describes the request
    /// to send. The session stays open either way.
    pub fn submit(&mut self) -> Result<Submission, DashboardError> {
        let submission = match &self.state {
            ModalState::Closed => {
                return Err(DashboardError::validation("No form is open"));
            }
            _ if self.fields.website.trim().is_empty() || self.fields.password.is_empty() => {
                self.error = Some(REQUIRED_FIELDS_MESSAGE.to_string());
                return Err(DashboardError::validation(REQUIRED_FIELDS_MESSAGE));
            }
            ModalState::Adding => Submission::Create(self.fields.clone()),
            ModalState::Editing(id) => Submission::Update {
                id: id.clone(),
                fields: self.fields.clone(),
            },
        };
        self.error = None;
        Ok(submission)
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
        self.after_edit();
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
        self.after_edit();
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = self.field_mut(field);
        slot.zeroize();
        *slot = value.into();
        self.after_edit();
    }

    /// Fills the password field with a generated one.
    pub fn generate_password(&mut self) {
        let generated = strength::generate_strong_password(20);
        self.set_field(FormField::Password, generated);
    }

    fn after_edit(&mut self) {
        self.strength = strength::evaluate(&self.fields.password);
    }

    fn focused_mut(&mut self) -> &mut String {
        self.field_mut(self.focus)
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Website => &mut self.fields.website,
            FormField::Username => &mut self.fields.username,
            FormField::Password => &mut self.fields.password,
            FormField::Notes => &mut self.fields.notes,
        }
    }

    fn reset(&mut self) {
        self.fields.zeroize();
        self.focus = FormField::Website;
        self.strength = Strength::EMPTY;
        self.show_password = false;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::entry;

    fn store() -> EntryStore {
        let mut store = EntryStore::default();
        let mut second = entry("2", "b.com", "Abcdefgh1");
        second.username = Some("bob".into());
        store.replace(vec![entry("1", "a.com", "x"), second]);
        store
    }

    #[test]
    fn open_add_resets_form() {
        let mut modal = ModalSession::default();
        modal.open_add();
        modal.set_field(FormField::Website, "x.com");
        modal.open_add();
        assert_eq!(modal.state(), &ModalState::Adding);
        assert_eq!(modal.fields(), &EntryFields::default());
        assert!(modal.strength().is_empty());
    }

    #[test]
    fn open_edit_seeds_from_store() {
        let store = store();
        let mut modal = ModalSession::default();
        modal.open_edit(&EntryId::from("2"), &store).unwrap();
        assert_eq!(modal.state(), &ModalState::Editing(EntryId::from("2")));
        assert_eq!(modal.fields().website, "b.com");
        assert_eq!(modal.fields().username, "bob");
        assert_eq!(modal.strength().label, "Strong");
        assert_eq!(modal.title(), "Edit Password");
    }

    #[test]
    fn open_edit_unknown_id_is_noop() {
        let store = store();
        let mut modal = ModalSession::default();
        let err = modal.open_edit(&EntryId::from("404"), &store).unwrap_err();
        assert!(matches!(err, DashboardError::NotFoundLocally { .. }));
        assert_eq!(modal.state(), &ModalState::Closed);
    }

    #[test]
    fn open_then_close_leaves_closed() {
        let store = store();
        let mut modal = ModalSession::default();
        modal.open_edit(&EntryId::from("2"), &store).unwrap();
        modal.close();
        assert_eq!(modal.state(), &ModalState::Closed);
        assert_eq!(modal.fields(), &EntryFields::default());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&EntryId::from("2")).unwrap().website, "b.com");
    }

    #[test]
    fn submit_requires_website_and_password() {
        let mut modal = ModalSession::default();
        modal.open_add();
        modal.set_field(FormField::Website, "a.com");
        let err = modal.submit().unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
        assert_eq!(modal.state(), &ModalState::Adding);
        assert_eq!(modal.error(), Some(REQUIRED_FIELDS_MESSAGE));

        modal.set_field(FormField::Website, "   ");
        modal.set_field(FormField::Password, "pw");
        assert!(modal.submit().is_err());
    }

    #[test]
    fn submit_builds_create_or_update() {
        let store = store();
        let mut modal = ModalSession::default();
        modal.open_add();
        modal.set_field(FormField::Website, "new.com");
        modal.set_field(FormField::Password, "pw");
        match modal.submit().unwrap() {
            Submission::Create(fields) => assert_eq!(fields.website, "new.com"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(modal.error(), None);

        modal.open_edit(&EntryId::from("1"), &store).unwrap();
        match modal.submit().unwrap() {
            Submission::Update { id, fields } => {
                assert_eq!(id, EntryId::from("1"));
                assert_eq!(fields.password, "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn typing_edits_focused_field_and_strength() {
        let mut modal = ModalSession::default();
        modal.open_add();
        for c in "site".chars() {
            modal.push_char(c);
        }
        modal.focus_next();
        modal.focus_next();
        assert_eq!(modal.focus(), FormField::Password);
        for c in "Abcdefgh1!".chars() {
            modal.push_char(c);
        }
        assert_eq!(modal.fields().website, "site");
        assert_eq!(modal.strength().label, "Very Strong");
        modal.pop_char();
        assert_eq!(modal.fields().password, "Abcdefgh1");
        modal.focus_prev();
        assert_eq!(modal.focus(), FormField::Username);
    }

    #[test]
    fn generate_fills_password() {
        let mut modal = ModalSession::default();
        modal.open_add();
        modal.generate_password();
        assert_eq!(modal.fields().password.chars().count(), 20);
    }
}
