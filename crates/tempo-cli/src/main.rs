use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tempo_core::config::load_config;

mod commands;
mod interactive;
mod render;

#[derive(Parser)]
#[command(
    name = "tempo",
    version,
    about = "Track task lists and per-task timers from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Configure the directory that holds task list files
    SetDir { path: PathBuf },
    /// Create a new task list (prompts for a name when omitted)
    CreateList { name: Vec<String> },
    /// Remove a task list
    RemoveList,
    /// Start or stop the timer of a task in a chosen list
    Start { number: usize },
    /// Mark a task in a chosen list complete
    Done { number: usize },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config().context("Configuration error")?;
    match cli.command {
        Some(Command::SetDir { path }) => commands::set_dir(config, &path),
        Some(Command::CreateList { name }) => commands::create_list(&config, name),
        Some(Command::RemoveList) => commands::remove_list(&config),
        Some(Command::Start { number }) => commands::start(&config, number),
        Some(Command::Done { number }) => commands::done(&config, number),
        None => interactive::run(&config),
    }
    Ok(())
}
