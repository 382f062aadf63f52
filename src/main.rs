use anyhow::Result;

use poker_event_engine::cli::Command;
use poker_event_engine::{
    handle_browse, handle_buyin, handle_completions, handle_series, handle_status, handle_sync, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Status {
            date,
            start,
            late_reg,
            level_length,
            now,
        } => handle_status(
            *date,
            start.as_deref(),
            late_reg.as_deref(),
            *level_length,
            now.as_deref(),
        ),
        Command::Buyin { text } => handle_buyin(text),
        Command::Sync { force, from_file } => handle_sync(*force, from_file.as_deref()),
        Command::Browse { series, buyin, date } => handle_browse(series, *buyin, *date),
        Command::Series { buyin } => handle_series(*buyin),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
