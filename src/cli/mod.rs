pub mod output;
pub mod process;
pub mod report;

use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use process::{kill_previous_servers, restart_server};
use report::{process_history_command, process_status_command, process_week_command, HistoryCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::start_daemon,
    intake::IntakeTracker,
    reminder::notify::{DesktopNotifier, Notifier},
    store::{history::HistoryStore, medium::JsonFileMedium, settings::Settings},
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

const GLASS_SIZE_PRESETS: [u32; 6] = [150, 200, 250, 300, 350, 500];
const REMINDER_INTERVALS: [u32; 4] = [30, 60, 90, 120];

#[derive(Parser, Debug)]
#[command(name = "Waterlog", version, long_about = None)]
#[command(about = "Track your daily water intake", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log one or more glasses of water for today")]
    Drink {
        #[arg(
            short,
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..=20),
            help = "Number of glasses to log at once"
        )]
        count: u32,
    },
    #[command(about = "Remove the most recently logged glass of today")]
    Undo,
    #[command(about = "Show today's progress")]
    Status,
    #[command(about = "Show the 7 days ending today with weekly totals")]
    Week,
    #[command(about = "Show the record of a single day")]
    History {
        #[command(flatten)]
        command: HistoryCommand,
    },
    #[command(about = "Show or change the configuration")]
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    #[command(about = "Delete all settings and history. Irreversible")]
    Reset {
        #[arg(long, help = "Confirm the reset")]
        yes: bool,
    },
    #[command(about = "Start the reminder daemon for the application")]
    Init {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(
        about = "Run the reminder daemon directly in current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Stop a currently running reminder daemon.")]
    Stop {},
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    #[command(about = "Print the current configuration")]
    Show,
    #[command(about = "Change configuration values and commit them as a whole")]
    Set {
        #[arg(
            long = "daily-goal",
            value_parser = clap::value_parser!(u32).range(1..=20),
            help = "Glasses per day that count as a met goal, between 1 and 20"
        )]
        daily_goal: Option<u32>,
        #[arg(
            long = "glass-size",
            value_parser = parse_glass_size,
            help = "Glass volume in ml, one of 150, 200, 250, 300, 350 or 500"
        )]
        glass_size: Option<u32>,
        #[arg(long = "reminders", help = "Turn reminder notifications on or off")]
        reminders: Option<Toggle>,
        #[arg(
            long = "interval",
            value_parser = parse_reminder_interval,
            help = "Minutes between reminders, one of 30, 60, 90 or 120"
        )]
        interval: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(value: Toggle) -> Self {
        matches!(value, Toggle::On)
    }
}

fn parse_glass_size(value: &str) -> Result<u32, String> {
    parse_preset(value, &GLASS_SIZE_PRESETS)
}

fn parse_reminder_interval(value: &str) -> Result<u32, String> {
    parse_preset(value, &REMINDER_INTERVALS)
}

fn parse_preset(value: &str, presets: &[u32]) -> Result<u32, String> {
    let parsed = value.parse::<u32>().map_err(|e| e.to_string())?;
    if presets.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!(
            "{parsed} is not one of {}",
            presets
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        CLI_PREFIX,
        &create_application_default_path()?,
        logging_level,
        args.log,
    )?;

    match args.commands {
        Commands::Drink { count } => process_drink_command(count),
        Commands::Undo => process_undo_command(),
        Commands::Status => process_status_command(),
        Commands::Week => process_week_command(),
        Commands::History { command } => process_history_command(command),
        Commands::Settings { command } => process_settings_command(command),
        Commands::Reset { yes } => process_reset_command(yes),
        Commands::Init { dir } => restart_server(dir),
        Commands::Stop {} => {
            let process_name = env::current_exe().expect("Can't operate without an executable");
            kill_previous_servers(&process_name);
            Ok(())
        }
        Commands::Serve { dir } => {
            start_daemon(dir.map_or_else(create_application_default_path, Ok)?).await
        }
    }
}

fn default_medium() -> Result<JsonFileMedium> {
    Ok(JsonFileMedium::new(
        create_application_default_path()?.join("store"),
    ))
}

fn default_tracker() -> Result<IntakeTracker<JsonFileMedium>> {
    Ok(IntakeTracker::new(default_medium()?, DefaultClock))
}

fn process_drink_command(count: u32) -> Result<()> {
    let tracker = default_tracker()?;
    let settings = tracker.settings();

    let mut crossed_goal = false;
    let mut record = tracker.today();
    for _ in 0..count {
        let outcome = tracker.drink();
        crossed_goal |= outcome.goal_reached;
        record = outcome.record;
    }

    output::print_status(&record, &settings);
    if crossed_goal {
        // One-shot celebration for the glass that hit the goal exactly.
        DesktopNotifier.notify(
            "🎉 Goal achieved!",
            &format!(
                "You've hit your daily goal of {} glasses!",
                settings.daily_goal
            ),
        );
    }
    Ok(())
}

fn process_undo_command() -> Result<()> {
    let tracker = default_tracker()?;
    let record = tracker.undo();
    output::print_status(&record, &tracker.settings());
    Ok(())
}

fn process_settings_command(command: SettingsCommands) -> Result<()> {
    let tracker = default_tracker()?;

    match command {
        SettingsCommands::Show => {
            print_settings(&tracker.settings());
            Ok(())
        }
        SettingsCommands::Set {
            daily_goal,
            glass_size,
            reminders,
            interval,
        } => {
            if daily_goal.is_none()
                && glass_size.is_none()
                && reminders.is_none()
                && interval.is_none()
            {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::MissingRequiredArgument,
                        "Pass at least one of --daily-goal, --glass-size, --reminders, --interval",
                    )
                    .into());
            }

            // Merge over the stored values in memory, then commit the full
            // object. The storage layer never does partial updates.
            let current = tracker.settings();
            let updated = Settings {
                daily_goal: daily_goal.unwrap_or(current.daily_goal),
                glass_size_ml: glass_size.unwrap_or(current.glass_size_ml),
                reminder_enabled: reminders.map(bool::from).unwrap_or(current.reminder_enabled),
                reminder_interval_minutes: interval.unwrap_or(current.reminder_interval_minutes),
            };
            tracker.save_settings(&updated);
            print_settings(&updated);
            Ok(())
        }
    }
}

fn print_settings(settings: &Settings) {
    println!("Daily goal:        {} glasses", settings.daily_goal);
    println!("Glass size:        {}ml", settings.glass_size_ml);
    println!(
        "Reminders:         {}",
        if settings.reminder_enabled { "on" } else { "off" }
    );
    println!(
        "Reminder interval: {}m",
        settings.reminder_interval_minutes
    );
}

fn process_reset_command(yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes all settings and history and cannot be undone.");
        println!("Pass --yes to confirm.");
        return Ok(());
    }

    HistoryStore::new(default_medium()?, Box::new(DefaultClock)).reset();
    println!("All data removed.");
    Ok(())
}
