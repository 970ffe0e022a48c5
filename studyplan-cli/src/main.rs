use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studyplan_core::{
    adjust_schedule, events_to_ics, format_schedule, parse_local_start, parse_timezone, Priority,
    Scheduler,
};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "studyplan",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STUDYPLAN_BUILD_SHA"), ")"),
    about = "Plan study sessions with focus blocks and breaks"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a schedule from a tasks file
    Plan {
        /// Tasks as a JSON array or TOML [[task]] tables
        #[arg(long)]
        tasks: PathBuf,

        /// Treat the file as a JSON array of stored task rows
        #[arg(long, default_value_t = false)]
        records: bool,

        /// Priority given to every task read with --records
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Local start, "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        start: Option<String>,

        /// IANA timezone (default: from config)
        #[arg(long)]
        tz: Option<String>,

        /// Print the schedule as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Where to save the schedule (default: ~/.studyplan/schedule.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Correct one task's duration and shift everything after it
    Adjust {
        /// Saved schedule (default: ~/.studyplan/schedule.json)
        #[arg(long)]
        schedule: Option<PathBuf>,

        /// Task id to correct
        #[arg(long)]
        task: String,

        /// Actual minutes spent
        #[arg(long)]
        actual: i64,

        /// Where to save the result (default: overwrite the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print a saved schedule as an ICS calendar
    ExportIcs {
        #[arg(long)]
        schedule: Option<PathBuf>,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.studyplan/config.toml with defaults
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            tasks,
            records,
            priority,
            start,
            tz,
            json,
            out,
        } => {
            let source = if records {
                TaskSource::Records(priority)
            } else {
                TaskSource::Tasks
            };
            plan(tasks, source, start, tz, json, out)?
        }

        Command::Adjust {
            schedule,
            task,
            actual,
            out,
        } => adjust(schedule, &task, actual, out)?,

        Command::ExportIcs { schedule } => {
            let path = schedule_or_default(schedule)?;
            let entries = state::read_schedule(&path)?;
            print!("{}", events_to_ics(&entries));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

fn schedule_or_default(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => state::schedule_path(),
    }
}

enum TaskSource {
    Tasks,
    Records(Priority),
}

fn plan(
    tasks_path: PathBuf,
    source: TaskSource,
    start: Option<String>,
    tz: Option<String>,
    json: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::load_config()?;
    let tz = match tz {
        Some(name) => parse_timezone(&name)?,
        None => cfg.timezone,
    };

    let tasks = match source {
        TaskSource::Tasks => state::read_tasks(&tasks_path)?,
        TaskSource::Records(priority) => state::read_records(&tasks_path, priority)?,
    };
    let mut scheduler = Scheduler::try_with_config(cfg.schedule)?;
    let schedule = match start {
        Some(local) => scheduler.create_schedule(&tasks, parse_local_start(&local, tz)?),
        None => scheduler.create_schedule_now(&tasks, tz),
    }
    .with_context(|| format!("scheduling tasks from {}", tasks_path.display()))?;

    let out = schedule_or_default(out)?;
    state::write_schedule(&out, &schedule)?;
    tracing::info!(entries = schedule.len(), path = %out.display(), "schedule saved");

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else if schedule.is_empty() {
        println!("(no tasks to schedule)");
    } else {
        println!("{}", format_schedule(&schedule));
    }

    Ok(())
}

fn adjust(
    schedule_path: Option<PathBuf>,
    task_id: &str,
    actual: i64,
    out: Option<PathBuf>,
) -> Result<()> {
    let input = schedule_or_default(schedule_path)?;
    let schedule = state::read_schedule(&input)?;

    let result = adjust_schedule(&schedule, task_id, actual);
    if result.new_schedule == schedule {
        println!("No changes.");
        return Ok(());
    }

    let out = out.unwrap_or(input);
    state::write_schedule(&out, &result.new_schedule)?;

    for line in &result.adjustments {
        println!("- {line}");
    }
    println!("\n{}", format_schedule(&result.new_schedule));

    Ok(())
}
