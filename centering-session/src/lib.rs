//! Reveal sessions for discourse-centering results.
//!
//! [`RevealController`] is a deterministic state machine over logical
//! milliseconds: submissions, gateway responses, the per-sentence reveal dwell
//! and the clear transition all go through one `dispatch`. [`RevealRunner`]
//! drives it on tokio with a real [`centering_gateway::AnalysisGateway`].

mod controller;
mod runner;
mod schedule;
mod session;

pub use controller::{
    Action, PendingRequest, Phase, RevealController, Ticket, ViewError, ViewFlags, ViewSnapshot,
};
pub use runner::{RevealHandle, RevealRunner, RunnerStopped};
pub use schedule::{Owner, ScheduledTask, Scheduler, TaskId, TaskKind};
pub use session::{AnalysisSession, SessionId};
