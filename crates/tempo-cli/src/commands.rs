use std::fs;
use std::path::{Path, PathBuf};

use tempo_core::config::{resolve_user_home_dir, save_config, Config};
use tempo_core::lists::{self, display_name, list_files};
use tempo_core::store::load_list;
use tempo_core::task::TaskList;

use crate::interactive;

pub fn set_dir(mut config: Config, path: &Path) {
    let expanded = expand_home(path);
    let absolute = match fs::canonicalize(&expanded) {
        Ok(absolute) => absolute,
        Err(_) => {
            println!("[!] Directory not found: {}", expanded.display());
            return;
        }
    };
    if !absolute.is_dir() {
        println!("[!] Not a directory: {}", absolute.display());
        return;
    }

    config.task_folder = absolute.display().to_string();
    match save_config(&config) {
        Ok(_) => {
            println!("[+] Task directory set: {}", absolute.display());
            show_dir_contents(&absolute);
        }
        Err(err) => println!("[!] Save error: {err}"),
    }
}

pub fn create_list(config: &Config, words: Vec<String>) {
    let Some(folder) = require_folder(config) else {
        return;
    };

    let name = if words.is_empty() {
        print!("Enter list name: ");
        interactive::flush();
        match interactive::read_line() {
            Some(name) if !name.is_empty() => name,
            _ => {
                println!("[!] List name cannot be empty");
                return;
            }
        }
    } else {
        words.join(" ")
    };

    match lists::create_list(&folder, &name) {
        Ok(_) => {
            println!("[+] Created list: {name}");
            show_dir_contents(&folder);
        }
        Err(err) => println!("[!] {err}"),
    }
}

pub fn remove_list(config: &Config) {
    let Some(folder) = require_folder(config) else {
        return;
    };
    let files = match list_files(&folder) {
        Ok(files) => files,
        Err(err) => {
            println!("[!] {err}");
            return;
        }
    };

    let selected = if files.len() == 1 {
        files[0].clone()
    } else {
        println!("[i] Found {} task lists:", files.len());
        println!();
        for (idx, file) in files.iter().enumerate() {
            println!("{}. {}", idx + 1, display_name(file));
        }
        print!("\nSelect list to remove (1-{}): ", files.len());
        interactive::flush();
        let choice = interactive::read_line().and_then(|line| line.parse::<usize>().ok());
        match choice.filter(|choice| (1..=files.len()).contains(choice)) {
            Some(choice) => files[choice - 1].clone(),
            None => {
                println!("[!] Invalid selection");
                return;
            }
        }
    };

    if !interactive::confirm_removal(&selected) {
        return;
    }
    match lists::remove_list(&folder, &selected) {
        Ok(()) => println!("[-] Removed: {selected}"),
        Err(err) => println!("[!] Failed to remove: {err}"),
    }
}

pub fn start(config: &Config, number: usize) {
    let Some((mut list, path)) = pick_and_load(config) else {
        return;
    };
    interactive::apply_toggle(number, &mut list, &path);
}

pub fn done(config: &Config, number: usize) {
    let Some((mut list, path)) = pick_and_load(config) else {
        return;
    };
    interactive::apply_done(number, &mut list, &path);
}

fn pick_and_load(config: &Config) -> Option<(TaskList, PathBuf)> {
    let folder = require_folder(config)?;
    let files = match list_files(&folder) {
        Ok(files) => files,
        Err(err) => {
            println!("[!] {err}");
            return None;
        }
    };
    let path = interactive::select_list_file(&folder, files)?;
    match load_list(&path) {
        Ok(list) => Some((list, path)),
        Err(err) => {
            println!("[!] Load error: {err}");
            None
        }
    }
}

fn require_folder(config: &Config) -> Option<PathBuf> {
    if config.task_folder.is_empty() {
        println!("[!] No task directory configured");
        println!("Use: tempo set-dir <path>");
        return None;
    }
    Some(PathBuf::from(&config.task_folder))
}

fn show_dir_contents(folder: &Path) {
    match list_files(folder) {
        Ok(files) => interactive::print_task_files(&files),
        Err(err) => println!("[i] {err}"),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = resolve_user_home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
