use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{CredentialApi, HttpApi};
use crate::config::Settings;
use crate::dashboard::{Action, Dashboard};
use crate::modal::FormField;
use crate::sync::{self, Outcome, Request};
use crate::{ui, view};

const TICK: Duration = Duration::from_millis(200);

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run(settings: &Settings) -> Result<()> {
    let api: Arc<dyn CredentialApi> = Arc::new(HttpApi::new(settings)?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to start runtime: {e}"))?;

    info!(base_url = %settings.base_url, "starting dashboard");

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dash = Dashboard::new();
    let result = runtime.block_on(event_loop(&mut terminal, api, &mut dash));

    teardown_terminal(&mut terminal);
    info!("dashboard closed");
    result
}

async fn event_loop(
    terminal: &mut Term,
    api: Arc<dyn CredentialApi>,
    dash: &mut Dashboard,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    if let Some(request) = dash.start() {
        spawn_request(&api, &tx, request);
    }

    loop {
        let frame = view::project(dash);
        terminal.draw(|f| ui::draw(f, &frame))?;
        if dash.is_finished() {
            break;
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(request) = action_for(key, dash).and_then(|a| dash.dispatch(a)) {
                        spawn_request(&api, &tx, request);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(anyhow!("Terminal input failed: {e}")),
                None => break,
            },
            Some(outcome) = rx.recv() => {
                if let Some(request) = dash.complete(outcome) {
                    spawn_request(&api, &tx, request);
                }
            }
            _ = tick.tick() => dash.expire_notification(Instant::now()),
        }
    }
    Ok(())
}

fn spawn_request(
    api: &Arc<dyn CredentialApi>,
    tx: &mpsc::UnboundedSender<Outcome>,
    request: Request,
) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = sync::perform(api.as_ref(), request).await;
        if tx.send(outcome).is_err() {
            debug!("dashboard gone before request finished");
        }
    });
}

fn teardown_terminal(terminal: &mut Term) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )
    .ok();
    terminal.show_cursor().ok();
}

/// Maps a key press to a dashboard action given what is on screen. Prompts
/// take priority over the modal, the modal over the search box.
pub fn action_for(key: KeyEvent, dash: &Dashboard) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if dash.guard().is_prompting() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmLogout),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::DeclineLogout),
            _ => None,
        };
    }

    if dash.pending_delete().is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CancelDelete),
            _ => None,
        };
    }

    if dash.modal().is_open() {
        return match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SubmitModal),
            KeyCode::Tab if dash.modal().focus() == FormField::Password => {
                Some(Action::FormGeneratePassword)
            }
            KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
            KeyCode::Char('h') | KeyCode::Char('H') if ctrl => Some(Action::FormTogglePassword),
            KeyCode::Char('g') | KeyCode::Char('G') if ctrl => Some(Action::FormGeneratePassword),
            KeyCode::Backspace => Some(Action::FormBackspace),
            KeyCode::Char(c) if !ctrl => Some(Action::FormInput(c)),
            _ => None,
        };
    }

    if dash.search_focused() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::BlurSearch),
            KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Up => Some(Action::SelectPrev),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char('u') if ctrl => Some(Action::ClearSearch),
            KeyCode::Char(c) if !ctrl => Some(Action::SearchInput(c)),
            _ => None,
        };
    }

    let selected = || dash.selected_id().cloned();
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Back),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Back),
        KeyCode::Char('/') => Some(Action::FocusSearch),
        KeyCode::Char('x') => Some(Action::ClearSearch),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Char('a') | KeyCode::Char('n') => Some(Action::OpenAdd),
        KeyCode::Char('e') | KeyCode::Enter => selected().map(Action::OpenEdit),
        KeyCode::Char('d') | KeyCode::Delete => selected().map(Action::RequestDelete),
        KeyCode::Char(' ') | KeyCode::Char('s') => selected().map(Action::ToggleReveal),
        _ => None,
    }
}
