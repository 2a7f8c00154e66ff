use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::{Days, Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::dates::{normalize_time_label, parse_date};

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "planner",
    version,
    about = "Day planner client: tasks, stickers and day colors over the planner REST API",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "plannerrc", global = true)]
    pub plannerrc: Option<PathBuf>,

    /// Backend origin, overrides `api.url`.
    #[arg(long = "url", global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the day panel: title, tasks and stickers.
    Day {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
    },
    /// List the tasks of a day.
    Tasks {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        /// Print panel markup instead of a table.
        #[arg(long)]
        html: bool,
    },
    /// Create a task.
    Add {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Update fields of an existing task.
    Edit {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Flip the completion of a task.
    Toggle {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        id: String,
    },
    /// Delete a task, after confirmation.
    Delete {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Reschedule a task to another day.
    Move {
        id: String,
        #[arg(value_parser = parse_date_arg)]
        new_date: NaiveDate,
    },
    /// List the stickers of a day.
    Stickers {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
    },
    /// Attach a sticker to a day.
    Sticker {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        sticker: String,
    },
    /// Set the color of a day.
    Color {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
        color: String,
    },
    /// List task categories.
    Categories,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = parse_time_arg)]
    pub time: Option<String>,
    /// Category id, see `planner categories`.
    #[arg(long = "category")]
    pub category_id: Option<String>,
}

/// `YYYY-MM-DD`, a date/time value, `today` or `tomorrow`.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    let today = Local::now().date_naive();
    match raw.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        "yesterday" => today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        _ => parse_date(raw).map_err(|e| e.to_string()),
    }
}

fn parse_time_arg(raw: &str) -> Result<String, String> {
    normalize_time_label(raw).map_err(|e| e.to_string())
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls `rc.key=value` (or `rc.key:value`) words out of the argument list.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((k.to_string(), v.to_string()))
            } else {
                rest.split_once(':')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<OsString> {
        words.iter().map(OsString::from).collect()
    }

    #[test]
    fn positional_rc_overrides_are_extracted() {
        let pre = preprocess_args(&args(&["planner", "rc.locale=en", "tasks", "2024-05-01"]))
            .expect("preprocess");
        assert_eq!(pre.rc_overrides, vec![("locale".to_string(), "en".to_string())]);
        assert_eq!(pre.cleaned_args, args(&["planner", "tasks", "2024-05-01"]));
    }

    #[test]
    fn parses_add_with_fields() {
        let cli = GlobalCli::try_parse_from(args(&[
            "planner",
            "add",
            "2024-05-01",
            "--title",
            "Buy milk",
            "--time",
            "9:30",
            "-v",
        ]))
        .expect("parse");
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Add { date, fields } => {
                assert_eq!(date, parse_date("2024-05-01").expect("date"));
                assert_eq!(fields.title.as_deref(), Some("Buy milk"));
                assert_eq!(fields.time.as_deref(), Some("09:30"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(GlobalCli::try_parse_from(args(&["planner", "tasks", "May 1st"])).is_err());
    }

    #[test]
    fn keyval_requires_equals() {
        assert!("api.url".parse::<KeyVal>().is_err());
        let kv: KeyVal = "api.url = http://x".parse().expect("kv");
        assert_eq!(kv.key, "api.url");
        assert_eq!(kv.value, "http://x");
    }
}
