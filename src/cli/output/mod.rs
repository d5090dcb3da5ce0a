use ansi_term::{Colour, Style};
use chrono::{Local, NaiveDate};

use crate::{
    store::{history::DayRecord, settings::Settings},
    utils::{percentage::intake_percentage, time::date_to_key},
};

const BAR_WIDTH: usize = 20;
/// Scale floor for the week chart. Sparse weeks would otherwise inflate a
/// single glass to a full-width bar.
const MIN_CHART_SCALE: u32 = 8;

pub fn print_status(record: &DayRecord, settings: &Settings) {
    let volume = record.glasses * settings.glass_size_ml;
    let goal_volume = record.goal * settings.glass_size_ml;

    println!(
        "{}: {}/{} glasses ({volume}ml / {goal_volume}ml, {})",
        record.date.format("%A %d %B"),
        Style::new().bold().paint(record.glasses.to_string()),
        record.goal,
        intake_percentage(record.glasses, record.goal),
    );
    if let Some(last) = record.last_drink() {
        println!(
            "Last drink at {}",
            last.with_timezone(&Local).format("%H:%M")
        );
    }
    if record.goal_met() {
        println!("{}", Colour::Green.paint("Daily goal achieved! 🎉"));
    }
}

pub fn print_day(record: &DayRecord, glass_size_ml: u32) {
    println!(
        "{}: {}/{} glasses, {}ml",
        date_to_key(record.date),
        record.glasses,
        record.goal,
        record.glasses * glass_size_ml
    );
    if record.timestamps.is_empty() {
        println!("No glasses logged.");
        return;
    }
    for timestamp in &record.timestamps {
        println!("  {}", timestamp.with_timezone(&Local).format("%H:%M:%S"));
    }
}

pub fn print_week(week: &[DayRecord], glass_size_ml: u32, today: NaiveDate) {
    let scale = chart_scale(week);
    for day in week {
        let bar = format!("{:<BAR_WIDTH$}", "█".repeat(bar_cells(day.glasses, scale)));
        let bar = if day.goal_met() {
            Colour::Green.paint(bar)
        } else {
            Colour::Cyan.paint(bar)
        };

        let label = day.date.format("%a %d/%m").to_string();
        let label = if day.date == today {
            Style::new().bold().paint(label)
        } else {
            Style::new().paint(label)
        };

        let check = if day.goal_met() { " ✓" } else { "" };
        println!("{label}  {bar}  {}/{}{check}", day.glasses, day.goal);
    }

    let summary = summarize(week, glass_size_ml);
    println!();
    println!(
        "Total: {} glasses ({:.1}L), daily average {:.1}, goals hit {}/{}",
        summary.total_glasses,
        f64::from(summary.total_ml) / 1000.,
        summary.average_glasses,
        summary.goals_hit,
        week.len()
    );
}

#[derive(Debug, PartialEq)]
pub struct WeekSummary {
    pub total_glasses: u32,
    pub total_ml: u32,
    pub average_glasses: f64,
    pub goals_hit: usize,
}

pub fn summarize(week: &[DayRecord], glass_size_ml: u32) -> WeekSummary {
    let total_glasses: u32 = week.iter().map(|d| d.glasses).sum();
    WeekSummary {
        total_glasses,
        total_ml: total_glasses * glass_size_ml,
        average_glasses: f64::from(total_glasses) / week.len().max(1) as f64,
        goals_hit: week.iter().filter(|d| d.goal_met()).count(),
    }
}

/// All bars share one scale: the tallest of count and goal across the week,
/// never below [MIN_CHART_SCALE].
fn chart_scale(week: &[DayRecord]) -> u32 {
    week.iter()
        .map(|d| d.glasses.max(d.goal))
        .max()
        .unwrap_or(0)
        .max(MIN_CHART_SCALE)
}

fn bar_cells(glasses: u32, scale: u32) -> usize {
    (glasses as usize * BAR_WIDTH) / scale as usize
}
