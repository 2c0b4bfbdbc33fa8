use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Active,
    Paused,
    Done,
}

/// One contiguous timed run of a task, closed when its timer stops.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Nanoseconds between `start_time` and `end_time`.
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub comment: String,
    pub sessions: Vec<Session>,
    /// Sum of all session durations, in nanoseconds.
    pub total_duration: i64,
    /// Set if and only if the task is Active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_start_time: Option<DateTime<Utc>>,
    /// Set if and only if the task is Done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: next_task_id(),
            title: title.into(),
            status: TaskStatus::Pending,
            comment: String::new(),
            sessions: Vec::new(),
            total_duration: 0,
            active_start_time: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// A named, independently persisted collection of tasks. Task "numbers"
/// throughout the crate are 1-based positions in `items`, not ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub title: String,
    pub items: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskList {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 1-based position of the Active task, if any. At most one task per
    /// list is Active; the timer engine relies on this lookup to keep it so.
    pub fn active_position(&self) -> Option<usize> {
        self.items.iter().position(Task::is_active).map(|idx| idx + 1)
    }
}

static LAST_TASK_ID: AtomicI64 = AtomicI64::new(0);

/// Time-derived task id, strictly increasing within the process even when
/// the clock returns the same nanosecond twice.
pub fn next_task_id() -> i64 {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let last = LAST_TASK_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(0);
    now.max(last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn next_task_id_is_strictly_increasing() {
        let ids: Vec<i64> = (0..100).map(|_| next_task_id()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} should precede {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn new_task_starts_pending_with_zero_duration() {
        let task = Task::new("Write docs");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.total_duration, 0);
        assert!(task.sessions.is_empty());
        assert!(task.active_start_time.is_none());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let raw = serde_json::to_string(&TaskStatus::Paused).expect("serialize");
        assert_eq!(raw, "\"paused\"");
    }

    #[test]
    fn optional_timestamps_are_omitted_when_absent() {
        let task = Task::new("Write docs");
        let raw = serde_json::to_string(&task).expect("serialize");
        assert!(!raw.contains("active_start_time"));
        assert!(!raw.contains("completed_at"));
        assert!(!raw.contains("null"));
    }

    #[test]
    fn active_position_is_one_based() {
        let mut list = TaskList::new("Inbox");
        list.items.push(Task::new("a"));
        let mut active = Task::new("b");
        active.status = TaskStatus::Active;
        active.active_start_time = Some(Utc::now());
        list.items.push(active);
        assert_eq!(list.active_position(), Some(2));
    }
}
