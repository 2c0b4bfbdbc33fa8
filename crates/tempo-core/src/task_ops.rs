use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::task::{Session, Task, TaskList, TaskStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskOpError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("invalid task number, use 1-{len}")]
    OutOfRange { len: usize },
    #[error("cannot change a completed task")]
    CompletedTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    /// The closing session is absent only when the stored list claimed an
    /// Active task without a start time.
    Stopped { session: Option<Session> },
}

/// Appends a Pending task with the trimmed title. Fails on a title that
/// trims to nothing; the list is left untouched in that case.
pub fn add_task(list: &mut TaskList, title: &str) -> Result<(), TaskOpError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskOpError::EmptyTitle);
    }
    list.items.push(Task::new(title));
    Ok(())
}

/// Removes and returns the task at the 1-based position, preserving the
/// order of the remaining tasks.
pub fn remove_task(list: &mut TaskList, position: usize) -> Result<Task, TaskOpError> {
    let idx = check_position(list, position)?;
    Ok(list.items.remove(idx))
}

/// Starts or stops the timer of the task at the 1-based position.
///
/// Starting a Pending or Paused task first stops whichever task is
/// currently Active (closing a session for it), so at most one task in the
/// list is ever Active. Stopping an Active task closes a session and moves
/// it to Paused; this is the only path that ends a session. Both
/// transitions within one call share a single `now`.
pub fn toggle_timer(list: &mut TaskList, position: usize) -> Result<ToggleOutcome, TaskOpError> {
    let idx = check_position(list, position)?;
    if list.items[idx].is_done() {
        return Err(TaskOpError::CompletedTask);
    }

    let now = Utc::now();
    if list.items[idx].is_active() {
        let session = stop_timer(&mut list.items[idx], now);
        return Ok(ToggleOutcome::Stopped { session });
    }

    if let Some(active) = list.active_position() {
        stop_timer(&mut list.items[active - 1], now);
    }
    let task = &mut list.items[idx];
    task.status = TaskStatus::Active;
    task.active_start_time = Some(now);
    Ok(ToggleOutcome::Started)
}

/// Marks the task at the 1-based position Done, stopping its timer first
/// if it is running. Returns the closing session, if one was produced.
/// Done is terminal: completing an already-completed task is rejected.
pub fn mark_complete(list: &mut TaskList, position: usize) -> Result<Option<Session>, TaskOpError> {
    let idx = check_position(list, position)?;
    if list.items[idx].is_done() {
        return Err(TaskOpError::CompletedTask);
    }

    let now = Utc::now();
    let task = &mut list.items[idx];
    let session = stop_timer(task, now);
    task.status = TaskStatus::Done;
    task.completed_at = Some(now);
    Ok(session)
}

fn check_position(list: &TaskList, position: usize) -> Result<usize, TaskOpError> {
    if position < 1 || position > list.items.len() {
        return Err(TaskOpError::OutOfRange {
            len: list.items.len(),
        });
    }
    Ok(position - 1)
}

fn stop_timer(task: &mut Task, end_time: DateTime<Utc>) -> Option<Session> {
    let start_time = task.active_start_time.take()?;
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(i64::MAX);
    let session = Session {
        start_time,
        end_time,
        duration,
    };
    task.sessions.push(session.clone());
    task.total_duration += duration;
    task.status = TaskStatus::Paused;
    Some(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list_with(titles: &[&str]) -> TaskList {
        let mut list = TaskList::new("Inbox");
        for title in titles {
            add_task(&mut list, title).expect("add");
        }
        list
    }

    #[test]
    fn add_task_rejects_whitespace_titles() {
        let mut list = list_with(&["keep"]);
        assert_eq!(add_task(&mut list, "   "), Err(TaskOpError::EmptyTitle));
        assert_eq!(add_task(&mut list, ""), Err(TaskOpError::EmptyTitle));
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn add_task_trims_the_title() {
        let mut list = list_with(&[]);
        add_task(&mut list, "  write docs  ").expect("add");
        assert_eq!(list.items[0].title, "write docs");
    }

    #[test]
    fn remove_task_preserves_order_of_the_rest() {
        let mut list = list_with(&["one", "two", "three"]);
        let removed = remove_task(&mut list, 1).expect("remove");
        assert_eq!(removed.title, "one");
        assert_eq!(list.items[0].title, "two");
        assert_eq!(list.items[1].title, "three");
    }

    #[test]
    fn remove_task_rejects_out_of_range_positions() {
        let mut list = list_with(&["only"]);
        assert_eq!(
            remove_task(&mut list, 0),
            Err(TaskOpError::OutOfRange { len: 1 })
        );
        assert_eq!(
            remove_task(&mut list, 2),
            Err(TaskOpError::OutOfRange { len: 1 })
        );
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn toggle_starts_then_pauses_not_back_to_pending() {
        let mut list = list_with(&["task"]);

        let outcome = toggle_timer(&mut list, 1).expect("start");
        assert_eq!(outcome, ToggleOutcome::Started);
        assert_eq!(list.items[0].status, TaskStatus::Active);
        assert!(list.items[0].active_start_time.is_some());

        let outcome = toggle_timer(&mut list, 1).expect("stop");
        let ToggleOutcome::Stopped { session } = outcome else {
            panic!("expected stop");
        };
        let session = session.expect("closing session");
        assert!(session.end_time >= session.start_time);
        assert!(session.duration >= 0);

        let task = &list.items[0];
        assert_eq!(task.status, TaskStatus::Paused);
        assert!(task.active_start_time.is_none());
        assert_eq!(task.sessions.len(), 1);
        assert_eq!(task.total_duration, session.duration);
    }

    #[test]
    fn starting_second_task_stops_the_first() {
        let mut list = list_with(&["a", "b"]);
        toggle_timer(&mut list, 1).expect("start a");
        toggle_timer(&mut list, 2).expect("start b");

        assert_eq!(list.items[0].status, TaskStatus::Paused);
        assert_eq!(list.items[0].sessions.len(), 1);
        assert_eq!(list.items[1].status, TaskStatus::Active);
        assert_eq!(list.active_position(), Some(2));
    }

    #[test]
    fn at_most_one_task_is_active_after_any_toggle_sequence() {
        let mut list = list_with(&["a", "b", "c"]);
        for position in [1, 2, 3, 2, 1, 3, 3, 1] {
            toggle_timer(&mut list, position).expect("toggle");
            let active = list.items.iter().filter(|task| task.is_active()).count();
            assert!(active <= 1, "{active} active tasks after toggling {position}");
        }
    }

    #[test]
    fn stop_and_start_share_one_instant() {
        let mut list = list_with(&["a", "b"]);
        toggle_timer(&mut list, 1).expect("start a");
        toggle_timer(&mut list, 2).expect("start b");

        let closed = list.items[0].sessions[0].end_time;
        let started = list.items[1].active_start_time.expect("active start");
        assert_eq!(closed, started);
    }

    #[test]
    fn toggle_rejects_completed_tasks() {
        let mut list = list_with(&["task"]);
        mark_complete(&mut list, 1).expect("complete");
        assert_eq!(toggle_timer(&mut list, 1), Err(TaskOpError::CompletedTask));
    }

    #[test]
    fn toggle_rejects_out_of_range_positions() {
        let mut list = list_with(&["task"]);
        assert_eq!(
            toggle_timer(&mut list, 5),
            Err(TaskOpError::OutOfRange { len: 1 })
        );
    }

    #[test]
    fn mark_complete_on_active_task_closes_exactly_one_session() {
        let mut list = list_with(&["task"]);
        toggle_timer(&mut list, 1).expect("start");
        let session = mark_complete(&mut list, 1).expect("complete");
        assert!(session.is_some());

        let task = &list.items[0];
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.sessions.len(), 1);
        assert!(task.completed_at.is_some());
        assert!(task.active_start_time.is_none());
    }

    #[test]
    fn mark_complete_on_pending_task_produces_no_session() {
        let mut list = list_with(&["task"]);
        let session = mark_complete(&mut list, 1).expect("complete");
        assert!(session.is_none());
        assert!(list.items[0].sessions.is_empty());
        assert_eq!(list.items[0].total_duration, 0);
    }

    #[test]
    fn mark_complete_is_not_repeatable() {
        let mut list = list_with(&["task"]);
        mark_complete(&mut list, 1).expect("complete");
        let first_stamp = list.items[0].completed_at;
        assert_eq!(mark_complete(&mut list, 1), Err(TaskOpError::CompletedTask));
        assert_eq!(list.items[0].completed_at, first_stamp);
    }

    #[test]
    fn total_duration_accumulates_across_sessions() {
        let mut list = list_with(&["task"]);
        for _ in 0..3 {
            toggle_timer(&mut list, 1).expect("start");
            toggle_timer(&mut list, 1).expect("stop");
        }
        let task = &list.items[0];
        assert_eq!(task.sessions.len(), 3);
        let sum: i64 = task.sessions.iter().map(|session| session.duration).sum();
        assert_eq!(task.total_duration, sum);
    }
}
