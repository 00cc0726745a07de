//! Back-navigation guard for the dashboard view.
//!
//! Once armed, leaving the dashboard needs an explicit logout confirmation.
//! This is a convenience for the user, not an access control: the server
//! still owns session invalidation.

use tracing::{debug, info};

pub const LOGOUT_PATH: &str = "/logout";
pub const LOGOUT_PROMPT: &str = "Do you want to logout and leave the dashboard?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Unarmed,
    Armed,
    /// Terminal: the user confirmed leaving.
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackNavigation {
    /// Held on the dashboard; the logout prompt is showing.
    Intercepted,
    /// Nothing to guard; the caller may leave.
    PassThrough,
}

#[derive(Debug, Default)]
pub struct NavGuard {
    state: GuardState,
    prompting: bool,
}

impl NavGuard {
    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == GuardState::Armed
    }

    pub fn is_prompting(&self) -> bool {
        self.prompting
    }

    /// Pushes the checkpoint. Idempotent while armed, and a no-op once torn
    /// down.
    pub fn arm(&mut self) {
        if self.state == GuardState::Unarmed {
            debug!("navigation guard armed");
            self.state = GuardState::Armed;
        }
    }

    pub fn on_back(&mut self) -> BackNavigation {
        match self.state {
            GuardState::Armed => {
                self.prompting = true;
                self.arm();
                BackNavigation::Intercepted
            }
            GuardState::Unarmed | GuardState::TornDown => BackNavigation::PassThrough,
        }
    }

    /// The user agreed to leave. Returns where to go, or `None` when no
    /// prompt was pending.
    pub fn confirm(&mut self) -> Option<&'static str> {
        if !self.prompting {
            return None;
        }
        self.prompting = false;
        self.state = GuardState::TornDown;
        info!("logout confirmed, navigation guard torn down");
        Some(LOGOUT_PATH)
    }

    pub fn decline(&mut self) {
        if self.prompting {
            self.prompting = false;
            self.arm();
        }
    }
}
