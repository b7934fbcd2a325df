//! Cancellable tasks on a logical millisecond clock.

use std::collections::BTreeMap;

use tracing::debug;

use crate::session::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Who a task belongs to. Cancelling an owner cancels all of its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Session(SessionId),
    /// View transitions that outlive a session, such as clearing.
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Move the reveal cursor one sentence forward.
    Advance,
    HideInput,
    ShowResults,
    HideResults,
    DestroySession,
    ShowInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub owner: Owner,
    pub kind: TaskKind,
    pub due: u64,
}

/// Pending tasks ordered by due time, ties broken by scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: BTreeMap<(u64, TaskId), (Owner, TaskKind)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, owner: Owner, kind: TaskKind, due: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert((due, id), (owner, kind));
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let key = self.tasks.keys().find(|(_, task)| *task == id).copied();
        key.map_or(false, |key| self.tasks.remove(&key).is_some())
    }

    /// Cancel every task of `owner`, returning how many were dropped.
    pub fn cancel_owner(&mut self, owner: Owner) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, (task_owner, _)| *task_owner != owner);
        let cancelled = before - self.tasks.len();
        if cancelled > 0 {
            debug!(?owner, cancelled, "cancelled pending tasks");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<ScheduledTask> {
        let (&(due, id), _) = self.tasks.first_key_value()?;
        if due > now {
            return None;
        }
        let (owner, kind) = self.tasks.remove(&(due, id))?;
        Some(ScheduledTask {
            id,
            owner,
            kind,
            due,
        })
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.tasks.keys().next().map(|(due, _)| *due)
    }

    pub fn pending(&self, owner: Owner) -> usize {
        self.tasks.values().filter(|(o, _)| *o == owner).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        let session = Owner::Session(SessionId::new(1));
        scheduler.schedule(session, TaskKind::Advance, 2000);
        scheduler.schedule(session, TaskKind::HideInput, 500);
        scheduler.schedule(session, TaskKind::ShowResults, 500);

        assert_eq!(scheduler.next_deadline(), Some(500));
        assert!(scheduler.pop_due(499).is_none());

        let kinds: Vec<TaskKind> = std::iter::from_fn(|| scheduler.pop_due(1000))
            .map(|task| task.kind)
            .collect();
        assert_eq!(kinds, vec![TaskKind::HideInput, TaskKind::ShowResults]);
        assert_eq!(scheduler.next_deadline(), Some(2000));
    }

    #[test]
    fn test_cancel_owner_leaves_other_owners() {
        let mut scheduler = Scheduler::new();
        let first = Owner::Session(SessionId::new(1));
        let second = Owner::Session(SessionId::new(2));
        scheduler.schedule(first, TaskKind::Advance, 2000);
        scheduler.schedule(first, TaskKind::ShowResults, 1000);
        scheduler.schedule(second, TaskKind::Advance, 2000);
        scheduler.schedule(Owner::View, TaskKind::ShowInput, 1000);

        assert_eq!(scheduler.cancel_owner(first), 2);
        assert_eq!(scheduler.pending(first), 0);
        assert_eq!(scheduler.pending(second), 1);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_cancel_single_task() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(Owner::View, TaskKind::HideResults, 10);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.is_idle());
    }
}
