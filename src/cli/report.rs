use std::fmt::Display;

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::utils::{
    clock::{Clock, DefaultClock},
    time::parse_date_key,
};

use super::{default_tracker, output, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct HistoryCommand {
    #[arg(
        long = "date",
        short,
        help = "Day to show. Examples are \"yesterday\", \"last friday\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to show the record of a single day. History keys in their stored
/// `YYYY-MM-DD` form are accepted directly, everything else goes through the
/// human-friendly parser.
pub fn process_history_command(HistoryCommand { date, date_style }: HistoryCommand) -> Result<()> {
    let date = match date {
        Some(s) => match parse_date_key(&s) {
            Some(v) => v,
            None => match parse_date_string(&s, Local::now(), date_style.into()) {
                Ok(v) => v.date_naive(),
                Err(e) => {
                    return Err(Args::command()
                        .error(
                            clap::error::ErrorKind::ValueValidation,
                            format!("Failed to parse date {e}"),
                        )
                        .into());
                }
            },
        },
        None => DefaultClock.today(),
    };

    let tracker = default_tracker()?;
    let record = tracker.history().read(date);
    output::print_day(&record, tracker.settings().glass_size_ml);
    Ok(())
}

/// Command to show today's progress against the goal.
pub fn process_status_command() -> Result<()> {
    let tracker = default_tracker()?;
    output::print_status(&tracker.today(), &tracker.settings());
    Ok(())
}

/// Command to show the 7 days ending today together with weekly totals.
pub fn process_week_command() -> Result<()> {
    let tracker = default_tracker()?;
    let week = tracker.history().week_window();
    output::print_week(
        &week,
        tracker.settings().glass_size_ml,
        tracker.history().today_key(),
    );
    Ok(())
}
