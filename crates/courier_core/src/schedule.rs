//! Deferred actions driven by simulated time instead of wall-clock timers.
//!
//! The frame loop never blocks: callers schedule an action with a delay,
//! `advance` the scheduler by each frame's dt, and act on whatever comes due.
//! `cancel_all` drops every pending action, so a reset can never be undone by
//! an action queued before it.

/// Identifier returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TaskId,
    due_at: f32,
    task: T,
}

/// A queue of actions that come due after a simulated delay.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: f32,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Queue `task` to come due `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_at: self.now + delay.max(0.0),
            task,
        });
        id
    }

    /// Advance simulated time and return the tasks that came due, earliest first.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0);
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_at <= now);
        self.pending = waiting;
        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|p| p.task).collect()
    }

    /// Drop a single pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending task.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending task(s)", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
