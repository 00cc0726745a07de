//! Pure projection of the dashboard into what the screen shows. Nothing
//! here touches the terminal; `ui` draws whatever this produces.

use crate::dashboard::{Dashboard, LoadState, NoticeKind};
use crate::guard::LOGOUT_PROMPT;
use crate::modal::FormField;
use crate::reveal::{secret_display, toggle_label, SECRET_MASK};
use crate::strength::Strength;

pub const EMPTY_MESSAGE: &str = "No passwords stored yet";
pub const NO_MATCHES_MESSAGE: &str = "No matches found";
pub const RETRY_HINT: &str = "[r] Retry";
const COUNT_UNKNOWN: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub website: String,
    pub username: String,
    pub secret: String,
    pub toggle_label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    Error { message: String },
    Empty,
    NoMatches,
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub website: String,
    pub username: String,
    pub secret: String,
    pub notes: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
    pub strength: Strength,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub text: String,
    pub kind: Option<NoticeKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub count: String,
    pub search: String,
    pub search_focused: bool,
    pub body: ListBody,
    pub selected: Option<usize>,
    pub detail: Option<DetailView>,
    pub modal: Option<ModalView>,
    pub delete_prompt: Option<String>,
    pub logout_prompt: Option<&'static str>,
    pub footer: Footer,
}

pub fn project(dash: &Dashboard) -> DashboardView {
    let count = match dash.load_state() {
        LoadState::Failed(_) => COUNT_UNKNOWN.to_string(),
        _ => dash.store().len().to_string(),
    };

    let body = match dash.load_state() {
        LoadState::Loading if dash.store().is_empty() => ListBody::Loading,
        LoadState::Failed(message) => ListBody::Error {
            message: message.clone(),
        },
        _ if dash.store().is_empty() => ListBody::Empty,
        _ if dash.visible_len() == 0 => ListBody::NoMatches,
        _ => ListBody::Rows(rows(dash)),
    };

    let selected = matches!(body, ListBody::Rows(_)).then(|| dash.selected_index());
    let detail = match body {
        ListBody::Rows(_) => detail(dash),
        _ => None,
    };

    DashboardView {
        count,
        search: dash.search().raw().to_string(),
        search_focused: dash.search_focused(),
        body,
        selected,
        detail,
        modal: modal(dash),
        delete_prompt: dash
            .pending_delete()
            .map(|e| format!("Delete password for '{}'?", e.website)),
        logout_prompt: dash.guard().is_prompting().then_some(LOGOUT_PROMPT),
        footer: footer(dash),
    }
}

fn rows(dash: &Dashboard) -> Vec<RowView> {
    let selected = dash.selected_index();
    dash.visible_entries()
        .enumerate()
        .map(|(i, entry)| {
            let revealed = dash.reveal().is_revealed(&entry.id);
            RowView {
                website: entry.website.clone(),
                username: entry.username.clone().unwrap_or_else(|| "-".into()),
                secret: secret_display(revealed, &entry.password).to_string(),
                toggle_label: toggle_label(revealed),
                selected: i == selected,
            }
        })
        .collect()
}

fn detail(dash: &Dashboard) -> Option<DetailView> {
    let id = dash.selected_id()?;
    let entry = dash.store().get(id)?;
    let revealed = dash.reveal().is_revealed(id);
    Some(DetailView {
        website: entry.website.clone(),
        username: entry.username.clone().unwrap_or_else(|| "-".into()),
        secret: secret_display(revealed, &entry.password).to_string(),
        notes: if revealed {
            entry.notes.clone().unwrap_or_else(|| "-".into())
        } else {
            entry
                .notes
                .as_ref()
                .map_or_else(|| "-".into(), |_| SECRET_MASK.to_string())
        },
        created_at: entry.created_at.clone(),
    })
}

fn modal(dash: &Dashboard) -> Option<ModalView> {
    let session = dash.modal();
    if !session.is_open() {
        return None;
    }
    let fields = FormField::ALL
        .iter()
        .map(|field| {
            let raw = match field {
                FormField::Website => &session.fields().website,
                FormField::Username => &session.fields().username,
                FormField::Password => &session.fields().password,
                FormField::Notes => &session.fields().notes,
            };
            let value = if *field == FormField::Password && !session.password_visible() {
                "•".repeat(raw.chars().count())
            } else {
                raw.clone()
            };
            FieldView {
                label: field.label(),
                value,
                focused: session.focus() == *field,
            }
        })
        .collect();
    Some(ModalView {
        title: session.title(),
        fields,
        strength: session.strength(),
        error: session.error().map(str::to_string),
    })
}

fn footer(dash: &Dashboard) -> Footer {
    if let Some(note) = dash.notification() {
        return Footer {
            text: note.message.clone(),
            kind: Some(note.kind),
        };
    }
    if let Some(kind) = dash.in_flight() {
        return Footer {
            text: kind.progress_label().to_string(),
            kind: None,
        };
    }
    let hint = if dash.modal().is_open() {
        "↑/↓ field  Tab generate (on password)  Ctrl+H show  Enter save  Esc cancel"
    } else {
        "/ search  a add  e edit  d delete  Space show  r refresh  q logout"
    };
    Footer {
        text: hint.to_string(),
        kind: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Action;
    use crate::error::DashboardError;
    use crate::models::EntryId;
    use crate::store::entry;
    use crate::sync::Outcome;

    fn loaded() -> Dashboard {
        let mut dash = Dashboard::new();
        dash.start();
        dash.complete(Outcome::Listed(Ok(vec![
            entry("1", "a.com", "x"),
            entry("2", "b.com", "y"),
        ])));
        dash
    }

    #[test]
    fn rows_are_masked_until_revealed() {
        let mut dash = loaded();
        let view = project(&dash);
        let ListBody::Rows(rows) = &view.body else {
            panic!("expected rows");
        };
        assert!(rows.iter().all(|r| r.secret == SECRET_MASK && r.toggle_label == "Show"));
        assert_eq!(view.count, "2");

        dash.dispatch(Action::ToggleReveal(EntryId::from("2")));
        let ListBody::Rows(rows) = project(&dash).body else {
            panic!("expected rows");
        };
        assert_eq!(rows[1].secret, "y");
        assert_eq!(rows[1].toggle_label, "Hide");
        assert_eq!(rows[0].secret, SECRET_MASK);
    }

    #[test]
    fn loading_then_empty() {
        let mut dash = Dashboard::new();
        dash.start();
        assert_eq!(project(&dash).body, ListBody::Loading);
        dash.complete(Outcome::Listed(Ok(Vec::new())));
        assert_eq!(project(&dash).body, ListBody::Empty);
    }

    #[test]
    fn no_matches_is_distinct_from_empty() {
        let mut dash = loaded();
        dash.set_search("zzz");
        let view = project(&dash);
        assert_eq!(view.body, ListBody::NoMatches);
        assert!(view.detail.is_none());
    }

    #[test]
    fn failed_reload_shows_error_and_unknown_count() {
        let mut dash = loaded();
        dash.begin_reload();
        dash.complete(Outcome::Listed(Err(DashboardError::server("unauthorized"))));
        let view = project(&dash);
        assert_eq!(view.count, "—");
        assert_eq!(
            view.body,
            ListBody::Error {
                message: "unauthorized".into()
            }
        );
    }

    #[test]
    fn modal_masks_password_field() {
        let mut dash = loaded();
        dash.dispatch(Action::OpenEdit(EntryId::from("1")));
        let modal = project(&dash).modal.unwrap();
        assert_eq!(modal.title, "Edit Password");
        assert_eq!(modal.fields[0].value, "a.com");
        assert_eq!(modal.fields[2].value, "•");
        dash.dispatch(Action::FormTogglePassword);
        assert_eq!(project(&dash).modal.unwrap().fields[2].value, "x");
    }

    #[test]
    fn prompts_follow_state() {
        let mut dash = loaded();
        dash.dispatch(Action::RequestDelete(EntryId::from("1")));
        assert_eq!(
            project(&dash).delete_prompt.as_deref(),
            Some("Delete password for 'a.com'?")
        );
        dash.dispatch(Action::CancelDelete);
        dash.dispatch(Action::Back);
        assert_eq!(project(&dash).logout_prompt, Some(LOGOUT_PROMPT));
    }

    #[test]
    fn footer_shows_progress_while_busy() {
        let mut dash = loaded();
        dash.begin_reload();
        assert_eq!(project(&dash).footer.text, "Loading passwords...");
    }
}
