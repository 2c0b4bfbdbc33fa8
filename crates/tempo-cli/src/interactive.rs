use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempo_core::config::Config;
use tempo_core::lists::{self, display_name, list_files, ListDirError};
use tempo_core::store::{load_list, save_list};
use tempo_core::task::TaskList;
use tempo_core::task_ops::{add_task, mark_complete, remove_task, toggle_timer, ToggleOutcome};

use crate::render;

pub enum LoopExit {
    Quit,
    Return,
}

/// No-argument mode: pick a list, run its command loop, repeat until quit.
pub fn run(config: &Config) {
    if config.task_folder.is_empty() {
        println!("[!] No task directory configured");
        println!("Use: tempo set-dir <path>");
        return;
    }
    let folder = PathBuf::from(&config.task_folder);

    loop {
        let files = match list_files(&folder) {
            Ok(files) => files,
            Err(ListDirError::NoLists) => {
                println!("[i] No task lists found in: {}", folder.display());
                println!();
                println!("Let's create your first task list!");
                if !create_first_list(&folder) {
                    return;
                }
                continue;
            }
            Err(err) => {
                println!("[!] {err}");
                return;
            }
        };

        let Some(path) = select_list_file(&folder, files) else {
            return;
        };
        let mut list = match load_list(&path) {
            Ok(list) => list,
            Err(err) => {
                println!("[!] Error loading tasks: {err}");
                return;
            }
        };
        match run_list_loop(&mut list, &path) {
            LoopExit::Quit => return,
            LoopExit::Return => continue,
        }
    }
}

fn create_first_list(folder: &Path) -> bool {
    print!("Enter your first list name: ");
    flush();
    let Some(name) = read_line() else {
        return false;
    };
    if name.is_empty() {
        println!("[!] List name cannot be empty");
        return false;
    }
    match lists::create_list(folder, &name) {
        Ok(_) => {
            println!("[+] Created your first list: {name}");
            true
        }
        Err(err) => {
            println!("[!] {err}");
            false
        }
    }
}

/// List picker shared by interactive mode and `start`/`done`. Returns None
/// when input ends or no lists remain.
pub fn select_list_file(folder: &Path, mut files: Vec<String>) -> Option<PathBuf> {
    print_task_files(&files);
    loop {
        print!(
            "\nSelect list (1-{}), create 'c <name>', or remove 'r <number>': ",
            files.len()
        );
        flush();
        let input = read_line()?;
        if input.is_empty() {
            continue;
        }

        if let Some(name) = input.strip_prefix("c ") {
            let name = name.trim();
            if name.is_empty() {
                println!("[!] List name required");
                continue;
            }
            match lists::create_list(folder, name) {
                Ok(_) => println!("[+] Created: {name}"),
                Err(err) => {
                    println!("[!] {err}");
                    continue;
                }
            }
            files = refreshed_files(folder)?;
            print_task_files(&files);
            continue;
        }

        if let Some(number) = input.strip_prefix("r ") {
            match number.trim().parse::<usize>() {
                Ok(choice) if (1..=files.len()).contains(&choice) => {
                    let selected = files[choice - 1].clone();
                    if !confirm_removal(&selected) {
                        continue;
                    }
                    if let Err(err) = lists::remove_list(folder, &selected) {
                        println!("[!] Failed to remove: {err}");
                        continue;
                    }
                    println!("[-] Removed: {selected}");
                    files = refreshed_files(folder)?;
                    print_task_files(&files);
                }
                _ => println!("[!] Invalid selection"),
            }
            continue;
        }

        match input.parse::<usize>() {
            Ok(choice) if (1..=files.len()).contains(&choice) => {
                return Some(folder.join(&files[choice - 1]));
            }
            _ => println!("[!] Invalid selection"),
        }
    }
}

fn refreshed_files(folder: &Path) -> Option<Vec<String>> {
    match list_files(folder) {
        Ok(files) => Some(files),
        Err(err) => {
            println!("[!] {err}");
            None
        }
    }
}

pub fn print_task_files(files: &[String]) {
    println!("\n[i] Available task lists ({}):", files.len());
    println!();
    for (idx, file) in files.iter().enumerate() {
        println!("  {}. {}", idx + 1, display_name(file));
    }
}

pub fn confirm_removal(file: &str) -> bool {
    print!("Remove '{file}'? (y/N): ");
    flush();
    matches!(read_line().as_deref(), Some(answer) if answer.eq_ignore_ascii_case("y"))
}

fn run_list_loop(list: &mut TaskList, path: &Path) -> LoopExit {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("tasks");

    loop {
        render::draw_list(list, display_name(file_name));
        print!("\n> ");
        flush();
        let Some(input) = read_line() else {
            return LoopExit::Quit;
        };
        if input.is_empty() {
            continue;
        }
        if let Some(exit) = dispatch(&input, list, path) {
            return exit;
        }
    }
}

fn dispatch(input: &str, list: &mut TaskList, path: &Path) -> Option<LoopExit> {
    match input {
        "q" | "quit" | "exit" => return Some(LoopExit::Quit),
        "r" | "return" => return Some(LoopExit::Return),
        _ => {}
    }

    if let Some(title) = strip_command(input, &["add ", "a "]) {
        apply_add(title.trim(), list, path);
    } else if let Some(number) = strip_command(input, &["remove ", "r "]) {
        if let Some(number) = parse_number(number.trim()) {
            apply_remove(number, list, path);
        }
    } else if let Some(number) = strip_command(input, &["done ", "d "]) {
        if let Some(number) = parse_number(number.trim()) {
            apply_done(number, list, path);
        }
    } else if let Ok(number) = input.parse::<usize>() {
        apply_toggle(number, list, path);
    } else {
        println!(
            "[!] Invalid command. Type a number, 'add / a <task>', 'remove / r <number>', \
             'done / d <number>', 'r' to return, or 'q' to quit"
        );
    }
    None
}

fn strip_command<'a>(input: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
}

fn parse_number(raw: &str) -> Option<usize> {
    match raw.parse::<usize>() {
        Ok(number) => Some(number),
        Err(_) => {
            println!("[!] '{raw}' is not a valid number");
            None
        }
    }
}

fn apply_add(title: &str, list: &mut TaskList, path: &Path) {
    match add_task(list, title) {
        Ok(()) => {
            println!("[+] Added: {title}");
            persist(list, path);
        }
        Err(err) => println!("[!] {err}"),
    }
}

fn apply_remove(number: usize, list: &mut TaskList, path: &Path) {
    match remove_task(list, number) {
        Ok(task) => {
            println!("[-] Removed: {}", task.title);
            persist(list, path);
        }
        Err(err) => println!("[!] {err}"),
    }
}

pub fn apply_done(number: usize, list: &mut TaskList, path: &Path) {
    match mark_complete(list, number) {
        Ok(_session) => {
            let task = &list.items[number - 1];
            let total = if task.total_duration > 0 {
                format!(" [Total time: {}]", render::format_duration(task.total_duration))
            } else {
                String::new()
            };
            println!("[x] Completed: {}{total}", task.title);
            persist(list, path);
        }
        Err(err) => println!("[!] {err}"),
    }
}

pub fn apply_toggle(number: usize, list: &mut TaskList, path: &Path) {
    match toggle_timer(list, number) {
        Ok(ToggleOutcome::Started) => {
            println!("[>] Started: {}", list.items[number - 1].title);
            persist(list, path);
        }
        Ok(ToggleOutcome::Stopped { session }) => {
            let task = &list.items[number - 1];
            match session {
                Some(session) => println!(
                    "[|] Paused: {} [Session: {}] [Total: {}]",
                    task.title,
                    render::format_duration(session.duration),
                    render::format_duration(task.total_duration)
                ),
                None => println!("[|] Paused: {}", task.title),
            }
            persist(list, path);
        }
        Err(err) => println!("[!] {err}"),
    }
}

fn persist(list: &mut TaskList, path: &Path) {
    if let Err(err) = save_list(path, list) {
        println!("[!] Save error: {err}");
    }
}

pub fn read_line() -> Option<String> {
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(_) => None,
    }
}

pub fn flush() {
    let _ = io::stdout().flush();
}
