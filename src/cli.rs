use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::buyin::BuyinRange;
use crate::domain::CalendarDate;

#[derive(Parser, Debug)]
#[command(author, version, about = "poker event catalog engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Resolve the status of a single event
    Status {
        /// Scheduled date (YYYY-MM-DD)
        #[arg(long)]
        date: CalendarDate,
        /// Start time text, e.g. "7:30 PM"
        #[arg(long)]
        start: Option<String>,
        /// Late registration text, e.g. "Through Level 8"
        #[arg(long = "late-reg")]
        late_reg: Option<String>,
        /// Level length in minutes
        #[arg(long = "level-length")]
        level_length: Option<u32>,
        /// Local time to judge against (YYYY-MM-DDTHH:MM:SS), defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// Parse a buy-in expression
    Buyin {
        /// Buy-in text, e.g. "$1,000+$100"
        text: String,
    },
    /// Load the catalog into the local cache
    Sync {
        /// Ignore a fresh cache and fetch anyway
        #[arg(short, long)]
        force: bool,
        /// Read the catalog from a saved page file instead of the API
        #[arg(long = "from-file")]
        from_file: Option<PathBuf>,
    },
    /// List events matching the given filters
    Browse {
        /// Series to include (repeatable)
        #[arg(short, long)]
        series: Vec<String>,
        /// Buy-in range: all, 0-500, 500-1000, 1000-5000, 5000+
        #[arg(short, long, default_value = "all")]
        buyin: BuyinRange,
        /// Date to show, defaults to the earliest date in the catalog
        #[arg(short, long)]
        date: Option<CalendarDate>,
    },
    /// Show the catalog grouped by series
    Series {
        /// Buy-in range: all, 0-500, 500-1000, 1000-5000, 5000+
        #[arg(short, long, default_value = "all")]
        buyin: BuyinRange,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browse_filters() {
        let cli = Cli::try_parse_from([
            "poker-events",
            "browse",
            "--series",
            "WSOP",
            "--series",
            "EPT",
            "--buyin",
            "0-500",
            "--date",
            "2024-07-01",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Browse {
                series: vec!["WSOP".to_string(), "EPT".to_string()],
                buyin: BuyinRange::UpTo500,
                date: Some(CalendarDate::new(2024, 7, 1)),
            }
        );
    }

    #[test]
    fn test_rejects_bad_range_and_date() {
        assert!(Cli::try_parse_from(["poker-events", "series", "--buyin", "cheap"]).is_err());
        assert!(Cli::try_parse_from(["poker-events", "status", "--date", "tomorrow"]).is_err());
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
