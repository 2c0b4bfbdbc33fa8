use std::io::{self, Write};

use chrono::Local;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{self, Clear, ClearType},
};
use tempo_core::task::{Task, TaskList, TaskStatus};

pub const FOOTER: &str =
    " <num> start/stop | add <task> | remove <num> | done <num> | r back | q quit ";

pub fn draw_list(list: &TaskList, name: &str) {
    draw_full_screen(&list_lines(list, name), FOOTER);
}

/// Clears the screen and fills it: content truncated to the terminal
/// width, padded to height-2, a rule line, then the footer.
pub fn draw_full_screen(content: &[String], footer: &str) {
    let (width, height) = terminal_size();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));

    let body_height = height.saturating_sub(2);
    let mut printed = 0;
    for line in content {
        if printed >= body_height {
            break;
        }
        println!("{}", truncate_to_width(line, width));
        printed += 1;
    }
    while printed < body_height {
        println!();
        printed += 1;
    }

    println!("{}", "-".repeat(width));
    print!("{}", truncate_to_width(footer, width));
    let _ = stdout.flush();
}

fn terminal_size() -> (usize, usize) {
    match terminal::size() {
        Ok((width, height)) => (width as usize, height as usize),
        Err(_) => (80, 24),
    }
}

fn truncate_to_width(line: &str, width: usize) -> String {
    line.chars().take(width).collect()
}

pub fn list_lines(list: &TaskList, name: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let bar = "-".repeat(name.len() + 4);
    lines.push(String::new());
    lines.push(format!("  +{bar}+"));
    lines.push(format!("  |  {}  |", name.to_uppercase()));
    lines.push(format!("  +{bar}+"));

    let active = count_by(list, &[TaskStatus::Active]);
    let pending = count_by(list, &[TaskStatus::Pending, TaskStatus::Paused]);
    let done = count_by(list, &[TaskStatus::Done]);
    lines.push(format!(
        "  Active: {active} | Pending: {pending} | Done: {done}"
    ));
    lines.push(format!("  {}", "-".repeat(40)));
    lines.push(String::new());

    if active > 0 {
        lines.push("  ACTIVE".to_string());
        lines.push("  ------".to_string());
        lines.extend(task_lines(list, &[TaskStatus::Active]));
        lines.push(String::new());
    }
    if pending > 0 {
        lines.push("  PENDING".to_string());
        lines.push("  -------".to_string());
        lines.extend(task_lines(list, &[TaskStatus::Pending, TaskStatus::Paused]));
        lines.push(String::new());
    }
    if done > 0 {
        lines.push("  DONE".to_string());
        lines.push("  ----".to_string());
        lines.extend(task_lines(list, &[TaskStatus::Done]));
        lines.push(String::new());
    }

    lines
}

fn count_by(list: &TaskList, statuses: &[TaskStatus]) -> usize {
    list.items
        .iter()
        .filter(|task| statuses.contains(&task.status))
        .count()
}

fn task_lines(list: &TaskList, statuses: &[TaskStatus]) -> Vec<String> {
    let mut lines = Vec::new();
    // Numbers are absolute list positions so they match the commands the
    // footer advertises, even inside a filtered section.
    for (idx, task) in list.items.iter().enumerate() {
        if !statuses.contains(&task.status) {
            continue;
        }

        let icon = match task.status {
            TaskStatus::Active => ">>>",
            TaskStatus::Pending => "[ ]",
            TaskStatus::Paused => "[-]",
            TaskStatus::Done => "[x]",
        };
        let time_info = time_info(task);
        lines.push(format!("  {}. {} {}{}", idx + 1, icon, task.title, time_info));

        if !task.sessions.is_empty()
            && matches!(task.status, TaskStatus::Done | TaskStatus::Paused)
        {
            lines.push(session_summary(task));
        }
    }
    lines
}

fn time_info(task: &Task) -> String {
    match task.status {
        TaskStatus::Active => {
            if task.active_start_time.is_some() {
                " [Running]".to_string()
            } else {
                String::new()
            }
        }
        TaskStatus::Pending => {
            if task.total_duration > 0 {
                format!(" [Total: {}]", format_duration(task.total_duration))
            } else {
                String::new()
            }
        }
        TaskStatus::Paused => format!(" [Paused: {}]", format_duration(task.total_duration)),
        TaskStatus::Done => {
            let mut info = String::new();
            if task.total_duration > 0 {
                info.push_str(&format!(" [Total: {}]", format_duration(task.total_duration)));
            }
            if let Some(completed_at) = task.completed_at {
                info.push_str(&format!(
                    " @ {}",
                    completed_at.with_timezone(&Local).format("%H:%M")
                ));
            }
            info
        }
    }
}

fn session_summary(task: &Task) -> String {
    let mut summary = format!("     Sessions: {} | ", task.sessions.len());
    if task.sessions.len() <= 3 {
        let parts: Vec<String> = task
            .sessions
            .iter()
            .map(|session| format_duration(session.duration))
            .collect();
        summary.push_str(&parts.join(", "));
    } else {
        for session in &task.sessions[..2] {
            summary.push_str(&format_duration(session.duration));
            summary.push_str(", ");
        }
        summary.push_str(&format!("... +{} more", task.sessions.len() - 2));
    }
    summary
}

pub fn format_duration(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    let total_seconds = nanos / 1_000_000_000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
