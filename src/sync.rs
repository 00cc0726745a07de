//! Requests the dashboard asks for and what came back.

use tracing::debug;

use crate::api::CredentialApi;
use crate::error::DashboardError;
use crate::models::{CredentialEntry, EntryFields, EntryId};
use crate::modal::Submission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create(EntryFields),
    Update { id: EntryId, fields: EntryFields },
    Delete(EntryId),
    Logout(&'static str),
}

impl From<Submission> for Request {
    fn from(submission: Submission) -> Self {
        match submission {
            Submission::Create(fields) => Request::Create(fields),
            Submission::Update { id, fields } => Request::Update { id, fields },
        }
    }
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::List => RequestKind::Load,
            Request::Create(_) | Request::Update { .. } => RequestKind::Save,
            Request::Delete(_) => RequestKind::Delete,
            Request::Logout(_) => RequestKind::Logout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Load,
    Save,
    Delete,
    Logout,
}

impl RequestKind {
    pub fn progress_label(self) -> &'static str {
        match self {
            RequestKind::Load => "Loading passwords...",
            RequestKind::Save => "Saving...",
            RequestKind::Delete => "Deleting...",
            RequestKind::Logout => "Logging out...",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<CredentialEntry>, DashboardError>),
    Saved(Result<(), DashboardError>),
    Deleted {
        id: EntryId,
        result: Result<(), DashboardError>,
    },
    LoggedOut(Result<(), DashboardError>),
}

pub async fn perform(api: &dyn CredentialApi, request: Request) -> Outcome {
    debug!(kind = ?request.kind(), "performing request");
    match request {
        Request::List => Outcome::Listed(api.list().await),
        Request::Create(fields) => Outcome::Saved(api.create(&fields).await),
        Request::Update { id, fields } => Outcome::Saved(api.update(&id, &fields).await),
        Request::Delete(id) => {
            let result = api.delete(&id).await;
            Outcome::Deleted { id, result }
        }
        Request::Logout(path) => Outcome::LoggedOut(api.logout(path).await),
    }
}


#[cfg(test)]
mod tests {
    use super::fake::MemoryApi;
    use super::*;
    use crate::dashboard::{Action, Dashboard, LoadState};
    use crate::modal::ModalState;
    use crate::store::entry;

    /// Runs `request` and every follow-up it causes to completion.
    async fn drive(api: &MemoryApi, dash: &mut Dashboard, request: Option<Request>) {
        let mut next = request;
        while let Some(request) = next {
            let outcome = perform(api, request).await;
            next = dash.complete(outcome);
        }
    }

    async fn started(api: &MemoryApi) -> Dashboard {
        let mut dash = Dashboard::new();
        let request = dash.start();
        drive(api, &mut dash, request).await;
        dash
    }

    fn seed() -> Vec<CredentialEntry> {
        vec![entry("1", "a.com", "x"), entry("2", "b.com", "y")]
    }

    #[test]
    fn submission_maps_to_request_kind() {
        let mut fields = EntryFields::default();
        fields.website = "a.com".into();
        let request = Request::from(Submission::Update {
            id: EntryId::from("1"),
            fields,
        });
        assert_eq!(request.kind(), RequestKind::Save);
        assert_eq!(Request::List.kind().progress_label(), "Loading passwords...");
    }

    #[tokio::test]
    async fn create_then_reload_contains_entry() {
        let api = MemoryApi::with(seed());
        let mut dash = started(&api).await;
        assert_eq!(dash.store().len(), 2);

        dash.open_add();
        let request = {
            dash.dispatch(Action::FormInput('c'));
            for c in ".com".chars() {
                dash.dispatch(Action::FormInput(c));
            }
            dash.dispatch(Action::FormNextField);
            dash.dispatch(Action::FormNextField);
            dash.dispatch(Action::FormInput('z'));
            dash.dispatch(Action::SubmitModal)
        };
        drive(&api, &mut dash, request).await;

        assert_eq!(dash.modal().state(), &ModalState::Closed);
        assert!(
            dash.store()
                .entries()
                .iter()
                .any(|e| e.website == "c.com" && e.password == "z")
        );
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn invalid_form_never_calls_api() {
        let api = MemoryApi::with(seed());
        let mut dash = started(&api).await;
        let before = api.calls();

        dash.open_add();
        dash.dispatch(Action::FormInput('c'));
        let request = dash.dispatch(Action::SubmitModal);
        assert!(request.is_none());
        drive(&api, &mut dash, request).await;

        assert_eq!(api.calls(), before);
        assert_eq!(dash.modal().state(), &ModalState::Adding);
    }

    #[tokio::test]
    async fn update_replaces_entry_by_id() {
        let api = MemoryApi::with(seed());
        let mut dash = started(&api).await;

        dash.open_edit(&EntryId::from("1")).unwrap();
        dash.dispatch(Action::FormNextField);
        for c in "alice".chars() {
            dash.dispatch(Action::FormInput(c));
        }
        let request = dash.submit_modal();
        drive(&api, &mut dash, request).await;

        let updated = dash.store().get(&EntryId::from("1")).unwrap();
        assert_eq!(updated.username.as_deref(), Some("alice"));
        assert_eq!(dash.store().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_entry_and_reveal() {
        let api = MemoryApi::with(seed());
        let mut dash = started(&api).await;
        let id = EntryId::from("1");

        dash.toggle_reveal(&id).unwrap();
        dash.request_delete(&id).unwrap();
        let request = dash.confirm_delete();
        drive(&api, &mut dash, request).await;

        assert!(!dash.store().contains(&id));
        assert!(!dash.reveal().is_revealed(&id));
    }

    #[tokio::test]
    async fn server_failure_keeps_form_and_store() {
        let api = MemoryApi::with(seed());
        let mut dash = started(&api).await;
        *api.fail_with.lock().unwrap() = Some("database is locked".into());

        dash.open_add();
        for c in "c.com".chars() {
            dash.dispatch(Action::FormInput(c));
        }
        dash.dispatch(Action::FormPrevField);
        dash.dispatch(Action::FormPrevField);
        dash.dispatch(Action::FormInput('z'));
        let request = dash.submit_modal();
        drive(&api, &mut dash, request).await;

        assert_eq!(dash.modal().state(), &ModalState::Adding);
        assert_eq!(dash.modal().fields().website, "c.com");
        assert_eq!(dash.store().len(), 2);

        let request = dash.begin_reload();
        drive(&api, &mut dash, request).await;
        assert_eq!(
            dash.load_state(),
            &LoadState::Failed("database is locked".into())
        );
        assert_eq!(dash.store().len(), 2);
    }
}
