//! Task model for the focus-session scheduler.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Hard,
}

/// Ordering is High < Medium < Low, so an ascending sort puts high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
        })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        })
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Soft hint for when a task should run. Values are time-of-day strings
/// such as "9:00 AM"; only `start` influences placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredTimeWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Structural problems that make a task unschedulable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task id must be non-empty")]
    EmptyId,

    #[error("task {id}: duration must be positive, got {duration} minutes")]
    NonPositiveDuration { id: String, duration: i64 },

    #[error("task {id}: schedule runs past the representable time range")]
    OutOfRange { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Minutes.
    pub duration: i64,

    pub difficulty: Difficulty,
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_window: Option<PreferredTimeWindow>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            duration: 30,
            difficulty: Difficulty::Easy,
            priority: Priority::Medium,
            preferred_time_window: None,
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration = minutes;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_preferred_start(mut self, start: impl Into<String>) -> Self {
        self.preferred_time_window
            .get_or_insert_with(PreferredTimeWindow::default)
            .start = Some(start.into());
        self
    }

    pub fn with_preferred_end(mut self, end: impl Into<String>) -> Self {
        self.preferred_time_window
            .get_or_insert_with(PreferredTimeWindow::default)
            .end = Some(end.into());
        self
    }

    /// Preferred start string, if one was given.
    pub fn preferred_start(&self) -> Option<&str> {
        self.preferred_time_window
            .as_ref()
            .and_then(|w| w.start.as_deref())
    }

    /// Boundary check run before scheduling.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.id.trim().is_empty() {
            return Err(TaskError::EmptyId);
        }
        if self.duration <= 0 {
            return Err(TaskError::NonPositiveDuration {
                id: self.id.clone(),
                duration: self.duration,
            });
        }
        Ok(())
    }
}

/// One entry of a produced schedule: a work segment or a synthetic break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    #[serde(flatten)]
    pub task: Task,

    #[serde(with = "crate::time::zoned_serde")]
    pub start_time: DateTime<Tz>,
    #[serde(with = "crate::time::zoned_serde")]
    pub end_time: DateTime<Tz>,

    pub is_break: bool,

    /// Minutes; only set on breaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<i64>,
}

impl ScheduledTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn name(&self) -> &str {
        &self.task.name
    }

    /// Scheduled length of this entry in minutes.
    pub fn minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}
