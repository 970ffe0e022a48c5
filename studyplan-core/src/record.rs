//! Persisted task rows and their translation into scheduler tasks.
//!
//! The datastore keeps tasks as `{title, description, due_date, due_time,
//! difficulty, duration, task_type, status}`. The scheduler has its own,
//! smaller `Task`; this module is the seam between the two.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::task::{Difficulty, PreferredTimeWindow, Priority, Task, TaskError};
use crate::time::format_time_of_day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    OneTime,
    MultiDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// 24-hour "HH:MM".
    #[serde(default)]
    pub due_time: Option<String>,
    pub difficulty: RecordDifficulty,
    /// Minutes.
    pub duration: i64,
    pub task_type: TaskType,
    pub status: RecordStatus,
}

impl TaskRecord {
    /// Build a scheduler task. Records carry no priority, so the caller
    /// supplies one. A valid `due_time` becomes the preferred window end;
    /// it is informational only and never moves the schedule.
    pub fn to_task(&self, priority: Priority) -> Result<Task, TaskError> {
        let difficulty = match self.difficulty {
            RecordDifficulty::Hard => Difficulty::Hard,
            RecordDifficulty::Easy | RecordDifficulty::Medium => Difficulty::Easy,
        };

        let preferred_time_window = self
            .due_time
            .as_deref()
            .and_then(|s| NaiveTime::parse_from_str(s.trim(), "%H:%M").ok())
            .map(|t| PreferredTimeWindow {
                start: None,
                end: Some(format_time_of_day(t)),
            });

        let task = Task {
            id: self.id.clone(),
            name: self.title.clone(),
            description: self.description.clone().filter(|d| !d.trim().is_empty()),
            duration: self.duration,
            difficulty,
            priority,
            preferred_time_window,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Convert every pending record; completed ones are dropped.
pub fn tasks_from_records(
    records: &[TaskRecord],
    priority: Priority,
) -> Result<Vec<Task>, TaskError> {
    records
        .iter()
        .filter(|r| r.status == RecordStatus::Pending)
        .map(|r| r.to_task(priority))
        .collect()
}
