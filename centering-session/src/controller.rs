//! The reveal state machine.
//!
//! ```text
//! Input ──Submit──> Submitting ──Ok──> Revealing(0) ──dwell──> … ──> Revealing(N-1)
//!   ^                   │                      │
//!   └──────Err──────────┘                    Clear
//!   ^                                          v
//!   └────────── show input <── destroy <── hide results (Clearing)
//! ```
//!
//! Every change goes through [`RevealController::dispatch`], which takes the
//! current logical time in milliseconds. Timed transitions are tasks in a
//! [`Scheduler`] and only fire from `dispatch`, so the controller is fully
//! deterministic. [`crate::RevealRunner`] drives it from a real clock.

use thiserror::Error;
use tracing::{debug, info, warn};

use centering_view::{
    AnalysisPayload, BoundDiscourse, CenteringConfig, DiscourseView, GatewayError, GatewayResult,
    InputLimits, MatchOptions, RevealTiming, ValidationError,
};

use crate::schedule::{Owner, ScheduledTask, Scheduler, TaskKind};
use crate::session::{AnalysisSession, SessionId};

/// Identifies one submission. Responses carrying an older ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Submitting { ticket: Ticket },
    Revealing,
    Clearing,
}

#[derive(Debug)]
pub enum Action {
    /// Replace the draft text.
    EditText(String),
    Submit,
    GatewayResolved {
        ticket: Ticket,
        outcome: GatewayResult<AnalysisPayload>,
    },
    Clear,
    /// The view is going away: cancel everything now.
    Abandon,
    /// Only fire tasks that are due.
    Tick,
}

/// A request the caller must send to the gateway, answering with
/// [`Action::GatewayResolved`] and the same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub text: String,
}

/// Why the last submission did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ViewError {
    pub fn user_message(&self) -> String {
        match self {
            ViewError::Validation(e) => e.user_message(),
            ViewError::Gateway(e) => e.user_message(),
        }
    }
}

/// Panel visibility as the renderer should show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFlags {
    pub input_visible: bool,
    pub results_visible: bool,
    pub clear_visible: bool,
    pub loading: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            input_visible: true,
            results_visible: false,
            clear_visible: false,
            loading: false,
        }
    }
}

/// Everything a renderer needs after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub phase: Phase,
    pub flags: ViewFlags,
    pub draft: String,
    pub error: Option<String>,
    pub discourse: Option<DiscourseView>,
    pub pending_tasks: usize,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Input,
            flags: ViewFlags::default(),
            draft: String::new(),
            error: None,
            discourse: None,
            pending_tasks: 0,
        }
    }
}

#[derive(Debug)]
pub struct RevealController {
    limits: InputLimits,
    options: MatchOptions,
    timing: RevealTiming,
    phase: Phase,
    flags: ViewFlags,
    draft: String,
    error: Option<ViewError>,
    session: Option<AnalysisSession>,
    scheduler: Scheduler,
    next_ticket: u64,
    next_session: u64,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new(&CenteringConfig::default())
    }
}

impl RevealController {
    pub fn new(config: &CenteringConfig) -> Self {
        Self::with_parts(
            config.input_limits(),
            config.match_options(),
            config.reveal_timing(),
        )
    }

    pub fn with_parts(limits: InputLimits, options: MatchOptions, timing: RevealTiming) -> Self {
        Self {
            limits,
            options,
            timing,
            phase: Phase::Input,
            flags: ViewFlags::default(),
            draft: String::new(),
            error: None,
            session: None,
            scheduler: Scheduler::new(),
            next_ticket: 0,
            next_session: 0,
        }
    }

    /// Apply `action` at logical time `now`, then fire every task due by `now`.
    ///
    /// Returns the request to send when a submission was accepted.
    pub fn dispatch(&mut self, now: u64, action: Action) -> Option<PendingRequest> {
        let request = match action {
            Action::EditText(text) => {
                self.edit(text);
                None
            }
            Action::Submit => self.submit(),
            Action::GatewayResolved { ticket, outcome } => {
                self.resolve(now, ticket, outcome);
                None
            }
            Action::Clear => {
                self.clear(now);
                None
            }
            Action::Abandon => {
                self.abandon();
                None
            }
            Action::Tick => None,
        };

        while let Some(task) = self.scheduler.pop_due(now) {
            self.run_task(task);
        }

        request
    }

    fn edit(&mut self, text: String) {
        if self.phase != Phase::Input {
            debug!(phase = ?self.phase, "ignoring edit outside input");
            return;
        }
        self.draft = text;
    }

    fn submit(&mut self) -> Option<PendingRequest> {
        if self.phase != Phase::Input {
            debug!(phase = ?self.phase, "ignoring submit outside input");
            return None;
        }

        if let Err(e) = self.limits.validate(&self.draft) {
            info!(error = %e, "input rejected");
            self.error = Some(e.into());
            return None;
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.phase = Phase::Submitting { ticket };
        self.flags.loading = true;
        self.error = None;
        debug!(?ticket, "submitting");

        Some(PendingRequest {
            ticket,
            text: self.draft.clone(),
        })
    }

    fn resolve(&mut self, now: u64, ticket: Ticket, outcome: GatewayResult<AnalysisPayload>) {
        if self.phase != (Phase::Submitting { ticket }) {
            warn!(?ticket, phase = ?self.phase, "ignoring stale gateway response");
            return;
        }
        self.flags.loading = false;

        let payload = match outcome {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "analysis failed");
                self.phase = Phase::Input;
                self.error = Some(e.into());
                return;
            }
        };

        let discourse = BoundDiscourse::bind(&payload, self.options);
        if discourse.is_empty() {
            self.phase = Phase::Input;
            self.error = Some(GatewayError::EmptyResult.into());
            return;
        }

        let id = SessionId::new(self.next_session);
        self.next_session += 1;
        let owner = Owner::Session(id);
        let delay = self.timing.transition_delay_ms;

        self.scheduler.schedule(owner, TaskKind::HideInput, now + delay);
        self.scheduler.schedule(owner, TaskKind::ShowResults, now + 2 * delay);
        if discourse.len() > 1 {
            self.scheduler
                .schedule(owner, TaskKind::Advance, now + self.timing.dwell_ms);
        }

        info!(session = %id, sentences = discourse.len(), "revealing analysis");
        self.session = Some(AnalysisSession::new(id, discourse));
        self.phase = Phase::Revealing;
    }

    fn clear(&mut self, now: u64) {
        match self.phase {
            Phase::Revealing | Phase::Submitting { .. } => {}
            Phase::Input | Phase::Clearing => {
                debug!(phase = ?self.phase, "nothing to clear");
                return;
            }
        }

        if let Some(session) = &self.session {
            self.scheduler.cancel_owner(Owner::Session(session.id()));
        }
        self.phase = Phase::Clearing;
        self.flags.loading = false;

        let delay = self.timing.transition_delay_ms;
        self.scheduler.schedule(Owner::View, TaskKind::HideResults, now);
        self.scheduler
            .schedule(Owner::View, TaskKind::DestroySession, now + delay);
        self.scheduler
            .schedule(Owner::View, TaskKind::ShowInput, now + 2 * delay);
    }

    fn abandon(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        debug!(cancelled, "abandoning view");
        self.session = None;
        self.phase = Phase::Input;
        self.flags = ViewFlags::default();
        self.error = None;
    }

    fn run_task(&mut self, task: ScheduledTask) {
        if let Owner::Session(owner) = task.owner {
            if self.session.as_ref().map(AnalysisSession::id) != Some(owner) {
                debug!(?task, "dropping task of a finished session");
                return;
            }
        }

        match task.kind {
            TaskKind::Advance => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                session.advance();
                if !session.is_complete() {
                    self.scheduler
                        .schedule(task.owner, TaskKind::Advance, task.due + self.timing.dwell_ms);
                }
            }
            TaskKind::HideInput => self.flags.input_visible = false,
            TaskKind::ShowResults => {
                self.flags.results_visible = true;
                self.flags.clear_visible = true;
            }
            TaskKind::HideResults => {
                self.flags.results_visible = false;
                self.flags.clear_visible = false;
            }
            TaskKind::DestroySession => {
                self.session = None;
                self.draft.clear();
            }
            TaskKind::ShowInput => {
                self.flags.input_visible = true;
                self.phase = Phase::Input;
                info!("ready for input");
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn session(&self) -> Option<&AnalysisSession> {
        self.session.as_ref()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(AnalysisSession::cursor)
    }

    /// What the renderer may draw: sentences up to the cursor only.
    pub fn view(&self) -> Option<DiscourseView> {
        self.session.as_ref().map(AnalysisSession::view)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            phase: self.phase,
            flags: self.flags,
            draft: self.draft.clone(),
            error: self.error.as_ref().map(ViewError::user_message),
            discourse: self.view(),
            pending_tasks: self.scheduler.len(),
        }
    }
}
