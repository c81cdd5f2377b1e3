use serde::{Deserialize, Serialize};

/// Handle for a scheduled task, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskToken(u64);

/// Deferred engine work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledTask {
    /// Advance playback; stale generations are ignored when they fire.
    PlaybackStep { generation: u64 },
    /// Recompute the search-filtered region list.
    SearchRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTask {
    token: TaskToken,
    due_ms: u64,
    task: ScheduledTask,
}

/// Virtual-clock timer queue driven by the host.
///
/// Nothing fires on its own; the engine drains due tasks while the host
/// advances time. Tasks due at the same instant fire in scheduling order.
#[derive(Debug, Clone, Default)]
pub struct TaskScheduler {
    now_ms: u64,
    next_token: u64,
    pending: Vec<PendingTask>,
}

impl TaskScheduler {
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, task: ScheduledTask, delay_ms: u64) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.push(PendingTask {
            token,
            due_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        token
    }

    /// Returns whether the task was still pending.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.token != token);
        before != self.pending.len()
    }

    #[must_use]
    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.pending.iter().any(|pending| pending.token == token)
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Time until the earliest pending task fires.
    #[must_use]
    pub fn next_due_in_ms(&self) -> Option<u64> {
        self.pending
            .iter()
            .map(|pending| pending.due_ms.saturating_sub(self.now_ms))
            .min()
    }

    /// Removes the earliest task due at or before `until_ms` and moves the
    /// clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TaskToken, ScheduledTask)> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due_ms <= until_ms)
            .min_by_key(|(_, pending)| (pending.due_ms, pending.token))
            .map(|(position, _)| position)?;
        let pending = self.pending.remove(position);
        self.now_ms = self.now_ms.max(pending.due_ms);
        Some((pending.token, pending.task))
    }

    /// Moves the clock forward once due tasks are drained.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
