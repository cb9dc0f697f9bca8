use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::date_key::DateKey;

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

/// `YYYY-MM` argument of the month jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: chrono::Month,
}

impl std::str::FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("expected YYYY-MM, got: {s}"))?;
        let year: i32 = y
            .parse()
            .map_err(|e| anyhow!("invalid year in {s}: {e}"))?;
        let number: u8 = m
            .parse()
            .map_err(|e| anyhow!("invalid month in {s}: {e}"))?;
        let month = chrono::Month::try_from(number)
            .map_err(|_| anyhow!("month must be 01-12, got: {m}"))?;
        Ok(Self { year, month })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "daybook",
    version,
    about = "Daybook: a calendar with notes for every day",
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
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    /// Do not show the first-run introduction.
    #[arg(long = "skip-onboarding")]
    pub skip_onboarding: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Render the calendar, optionally switching view or date.
    Show {
        /// year, month, week or day
        view: Option<String>,
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Step back one unit of the active view.
    Prev,
    /// Step forward one unit of the active view.
    Next,
    /// Move the cursor to today.
    Today,
    /// Open the day view for a date.
    Day { date: DateKey },
    /// Open the week view containing a date.
    Week { date: DateKey },
    /// Open the month view for YYYY-MM.
    Month { month: YearMonth },
    /// Add a note (defaults to the cursor's day).
    Add {
        #[arg(long)]
        date: Option<DateKey>,
        #[arg(long)]
        color: Option<String>,
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Change a note's text and/or colour.
    Edit {
        id: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Delete a note.
    Delete { id: String },
    /// List notes for a day (defaults to the cursor's day).
    Notes { date: Option<DateKey> },
    /// Language, data location, version and legal links.
    Settings,
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
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls positional `rc.key=value` / `rc.key:value` overrides out of the
/// argument list before clap sees it.
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
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                rest.split_once(':')
                    .map(|(k, v)| (format!("rc.{k}"), v.to_string()))
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

    fn args(raw: &[&str]) -> Vec<OsString> {
        raw.iter().map(OsString::from).collect()
    }

    #[test]
    fn extracts_positional_rc_overrides() {
        let pre = preprocess_args(&args(&["daybook", "rc.lang=tr", "show", "rc.color:off"]))
            .expect("preprocess");
        assert_eq!(pre.cleaned_args, args(&["daybook", "show"]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.lang".to_string(), "tr".to_string()),
                ("rc.color".to_string(), "off".to_string()),
            ]
        );
    }

    #[test]
    fn parses_subcommands() {
        let cli = GlobalCli::try_parse_from([
            "daybook", "-vv", "--rc", "lang=tr", "add", "--date", "2025-03-15", "buy", "milk",
        ])
        .expect("parse cli");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.rc_overrides[0].key, "lang");
        assert_eq!(
            cli.command,
            Some(Command::Add {
                date: Some(DateKey::parse("2025-03-15").expect("valid key")),
                color: None,
                text: vec!["buy".to_string(), "milk".to_string()],
            })
        );
    }

    #[test]
    fn rejects_malformed_dates_and_months() {
        assert!(GlobalCli::try_parse_from(["daybook", "day", "2025-3-15"]).is_err());
        assert!(GlobalCli::try_parse_from(["daybook", "month", "2025-13"]).is_err());

        let cli = GlobalCli::try_parse_from(["daybook", "month", "2025-02"]).expect("parse cli");
        assert_eq!(
            cli.command,
            Some(Command::Month {
                month: YearMonth {
                    year: 2025,
                    month: chrono::Month::February,
                },
            })
        );
    }
}
