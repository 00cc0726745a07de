//! The dashboard session: one object owning every piece of client state,
//! constructed at startup and dropped when the user leaves.
//!
//! Network work is split in two halves. The `begin_*` side validates, marks
//! the request in flight and hands back a [`Request`]; [`Dashboard::complete`]
//! applies the matching [`Outcome`] and may hand back a follow-up request
//! (every successful mutation is followed by a full reload). Only one request
//! is in flight at a time.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::filter::{self, SearchState};
use crate::guard::{BackNavigation, GuardState, NavGuard};
use crate::modal::ModalSession;
use crate::models::{CredentialEntry, EntryId};
use crate::reveal::RevealState;
use crate::store::EntryStore;
use crate::sync::{Outcome, Request, RequestKind};

pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3200);
pub const BUSY_MESSAGE: &str = "Request in progress";
pub const SAVED_MESSAGE: &str = "Password saved successfully!";
pub const DELETED_MESSAGE: &str = "Password deleted successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

/// Everything a key press can ask of the dashboard. Row-level actions carry
/// the id of the row they were triggered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reload,
    SelectNext,
    SelectPrev,
    FocusSearch,
    BlurSearch,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,
    ToggleReveal(EntryId),
    OpenAdd,
    OpenEdit(EntryId),
    CloseModal,
    SubmitModal,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormTogglePassword,
    FormGeneratePassword,
    RequestDelete(EntryId),
    ConfirmDelete,
    CancelDelete,
    Back,
    ConfirmLogout,
    DeclineLogout,
}

#[derive(Debug)]
pub struct Dashboard {
    store: EntryStore,
    search: SearchState,
    reveal: RevealState,
    modal: ModalSession,
    guard: NavGuard,
    load: LoadState,
    in_flight: Option<RequestKind>,
    pending_delete: Option<EntryId>,
    notification: Option<Notification>,
    /// Store indices matching the search term, recomputed only when the
    /// store or the term changes.
    visible: Vec<usize>,
    selected: usize,
    search_focused: bool,
    finished: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            store: EntryStore::default(),
            search: SearchState::default(),
            reveal: RevealState::default(),
            modal: ModalSession::default(),
            guard: NavGuard::default(),
            load: LoadState::Loading,
            in_flight: None,
            pending_delete: None,
            notification: None,
            visible: Vec::new(),
            selected: 0,
            search_focused: false,
            finished: false,
        }
    }

    /// Arms the navigation guard and asks for the first list.
    pub fn start(&mut self) -> Option<Request> {
        self.guard.arm();
        self.begin_reload()
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn reveal(&self) -> &RevealState {
        &self.reveal
    }

    pub fn modal(&self) -> &ModalSession {
        &self.modal
    }

    pub fn guard(&self) -> &NavGuard {
        &self.guard
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn in_flight(&self) -> Option<RequestKind> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_delete(&self) -> Option<&CredentialEntry> {
        self.pending_delete.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// True once the logout round-trip finished and the session is over.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &CredentialEntry> {
        self.visible.iter().filter_map(|i| self.store.entries().get(*i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Id of the highlighted row. `None` while the error view hides the
    /// list, so row actions cannot reach entries the user cannot see.
    pub fn selected_id(&self) -> Option<&EntryId> {
        if matches!(self.load, LoadState::Failed(_)) {
            return None;
        }
        self.highlighted_id()
    }

    fn highlighted_id(&self) -> Option<&EntryId> {
        self.visible
            .get(self.selected)
            .and_then(|i| self.store.entries().get(*i))
            .map(|e| &e.id)
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Request> {
        match action {
            Action::Reload => return self.begin_reload(),
            Action::SelectNext => {
                if self.selected + 1 < self.visible.len() {
                    self.selected += 1;
                }
            }
            Action::SelectPrev => self.selected = self.selected.saturating_sub(1),
            Action::FocusSearch => self.search_focused = true,
            Action::BlurSearch => self.search_focused = false,
            Action::SearchInput(c) => {
                self.search.push(c);
                self.refilter();
            }
            Action::SearchBackspace => {
                self.search.pop();
                self.refilter();
            }
            Action::ClearSearch => self.set_search(""),
            Action::ToggleReveal(id) => {
                if let Err(e) = self.toggle_reveal(&id) {
                    debug!(error = %e, "ignoring reveal toggle");
                }
            }
            Action::OpenAdd => self.open_add(),
            Action::OpenEdit(id) => {
                if let Err(e) = self.open_edit(&id) {
                    debug!(error = %e, "ignoring edit request");
                }
            }
            Action::CloseModal => self.close_modal(),
            Action::SubmitModal => return self.submit_modal(),
            Action::FormInput(c) => self.modal.push_char(c),
            Action::FormBackspace => self.modal.pop_char(),
            Action::FormNextField => self.modal.focus_next(),
            Action::FormPrevField => self.modal.focus_prev(),
            Action::FormTogglePassword => self.modal.toggle_password_visibility(),
            Action::FormGeneratePassword => {
                self.modal.generate_password();
                self.notify(NoticeKind::Info, "Generated strong password");
            }
            Action::RequestDelete(id) => {
                if let Err(e) = self.request_delete(&id) {
                    debug!(error = %e, "ignoring delete request");
                }
            }
            Action::ConfirmDelete => return self.confirm_delete(),
            Action::CancelDelete => self.cancel_delete(),
            Action::Back => {
                if self.back() == BackNavigation::PassThrough {
                    self.finished = true;
                }
            }
            Action::ConfirmLogout => return self.confirm_logout(),
            Action::DeclineLogout => self.decline_logout(),
        }
        None
    }

    pub fn set_search(&mut self, raw: &str) {
        self.search.set(raw);
        self.refilter();
    }

    pub fn toggle_reveal(&mut self, id: &EntryId) -> Result<bool, DashboardError> {
        if !self.store.contains(id) {
            return Err(DashboardError::NotFoundLocally { id: id.clone() });
        }
        Ok(self.reveal.toggle(id))
    }

    pub fn open_add(&mut self) {
        if self.refuse_if_saving() {
            return;
        }
        self.search_focused = false;
        self.modal.open_add();
    }

    pub fn open_edit(&mut self, id: &EntryId) -> Result<(), DashboardError> {
        if self.refuse_if_saving() {
            return Ok(());
        }
        self.modal.open_edit(id, &self.store)?;
        self.search_focused = false;
        Ok(())
    }

    pub fn close_modal(&mut self) {
        if self.refuse_if_saving() {
            return;
        }
        self.modal.close();
    }

    pub fn begin_reload(&mut self) -> Option<Request> {
        if self.refuse_if_busy() {
            return None;
        }
        self.load = LoadState::Loading;
        self.start_request(Request::List)
    }

    /// Validates the open form and, if complete, returns the create or
    /// update request. Validation failures never leave the client.
    pub fn submit_modal(&mut self) -> Option<Request> {
        if self.refuse_if_busy() {
            return None;
        }
        match self.modal.submit() {
            Ok(submission) => self.start_request(Request::from(submission)),
            Err(e) => {
                self.notify(NoticeKind::Error, e.to_string());
                None
            }
        }
    }

    /// First step of a delete: remembers the target until the user confirms.
    pub fn request_delete(&mut self, id: &EntryId) -> Result<(), DashboardError> {
        if !self.store.contains(id) {
            return Err(DashboardError::NotFoundLocally { id: id.clone() });
        }
        self.pending_delete = Some(id.clone());
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> Option<Request> {
        if self.refuse_if_busy() {
            return None;
        }
        let id = self.pending_delete.take()?;
        self.start_request(Request::Delete(id))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn back(&mut self) -> BackNavigation {
        self.guard.on_back()
    }

    pub fn confirm_logout(&mut self) -> Option<Request> {
        let path = self.guard.confirm()?;
        self.in_flight = Some(RequestKind::Logout);
        Some(Request::Logout(path))
    }

    pub fn decline_logout(&mut self) {
        self.guard.decline();
    }

    pub fn complete(&mut self, outcome: Outcome) -> Option<Request> {
        if self.guard.state() == GuardState::TornDown
            && !matches!(outcome, Outcome::LoggedOut(_))
        {
            debug!("discarding outcome that arrived after logout");
            return None;
        }
        self.in_flight = None;
        match outcome {
            Outcome::Listed(Ok(entries)) => {
                self.store.replace(entries);
                self.reveal.clear();
                if self
                    .pending_delete
                    .as_ref()
                    .is_some_and(|id| !self.store.contains(id))
                {
                    self.pending_delete = None;
                }
                self.load = LoadState::Ready;
                self.refilter();
                info!(count = self.store.len(), "password list reloaded");
                None
            }
            Outcome::Listed(Err(e)) => {
                warn!(error = %e, "password list reload failed");
                self.load = LoadState::Failed(e.to_string());
                None
            }
            Outcome::Saved(Ok(())) => {
                info!("password saved");
                self.modal.close();
                self.notify(NoticeKind::Success, SAVED_MESSAGE);
                self.begin_reload()
            }
            Outcome::Saved(Err(e)) => {
                warn!(error = %e, "saving password failed");
                self.modal.fail(e.to_string());
                self.notify(NoticeKind::Error, format!("Error: {e}"));
                None
            }
            Outcome::Deleted { id, result: Ok(()) } => {
                info!(%id, "password deleted");
                self.reveal.forget(&id);
                self.notify(NoticeKind::Success, DELETED_MESSAGE);
                self.begin_reload()
            }
            Outcome::Deleted { id, result: Err(e) } => {
                warn!(%id, error = %e, "deleting password failed");
                self.notify(NoticeKind::Error, format!("Error: {e}"));
                None
            }
            Outcome::LoggedOut(result) => {
                if let Err(e) = result {
                    warn!(error = %e, "logout request failed; leaving anyway");
                }
                self.finished = true;
                None
            }
        }
    }

    /// Drops the notification once its time is up.
    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    fn refuse_if_busy(&mut self) -> bool {
        if let Some(kind) = self.in_flight {
            debug!(?kind, "request already in flight");
            self.notify(NoticeKind::Info, BUSY_MESSAGE);
            true
        } else {
            false
        }
    }

    /// The open form belongs to the save in flight; it must stay put until
    /// the outcome lands.
    fn refuse_if_saving(&mut self) -> bool {
        self.in_flight == Some(RequestKind::Save) && self.refuse_if_busy()
    }

    fn start_request(&mut self, request: Request) -> Option<Request> {
        self.in_flight = Some(request.kind());
        Some(request)
    }

    fn refilter(&mut self) {
        let selected = self.highlighted_id().cloned();
        let term = self.search.term();
        self.visible = self
            .store
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| filter::matches(e, term))
            .map(|(i, _)| i)
            .collect();
        self.selected = selected
            .and_then(|id| {
                self.visible
                    .iter()
                    .position(|i| self.store.entries()[*i].id == id)
            })
            .unwrap_or(0)
            .min(self.visible.len().saturating_sub(1));
    }
}
