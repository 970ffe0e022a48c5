use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use studyplan_core::{tasks_from_records, Priority, ScheduledTask, Task, TaskRecord};

pub fn studyplan_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".studyplan"))
}

pub fn ensure_studyplan_home() -> Result<PathBuf> {
    let dir = studyplan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Default location for the last schedule `plan` produced.
pub fn schedule_path() -> Result<PathBuf> {
    Ok(ensure_studyplan_home()?.join("schedule.json"))
}

#[derive(Debug, Deserialize)]
struct TomlTasks {
    #[serde(default)]
    task: Vec<Task>,
}

/// Read tasks from a JSON array or a TOML file of `[[task]]` tables.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
        }
        Some("toml") => {
            let parsed: TomlTasks =
                toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
            Ok(parsed.task)
        }
        _ => bail!(
            "unsupported tasks file {} (expected .json or .toml)",
            path.display()
        ),
    }
}

/// Read a JSON array of persisted task rows and convert the pending ones.
pub fn read_records(path: &Path, priority: Priority) -> Result<Vec<Task>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let records: Vec<TaskRecord> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    tasks_from_records(&records, priority)
        .with_context(|| format!("converting records from {}", path.display()))
}

pub fn read_schedule(path: &Path) -> Result<Vec<ScheduledTask>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_schedule(path: &Path, schedule: &[ScheduledTask]) -> Result<()> {
    let json = serde_json::to_string_pretty(schedule)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
