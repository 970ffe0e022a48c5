//! Schedule builder: turns an unordered task list into a timeline of work
//! segments and breaks.
//!
//! Greedy, single pass:
//! - stable sort by priority (high, medium, low)
//! - split each task into segments of at most `max_segment_minutes`
//! - short break between consecutive work segments
//! - long break once `long_break_after_minutes` of work has accumulated
//! - a preferred start may pull the clock forward, never back

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::task::{Difficulty, Priority, ScheduledTask, Task, TaskError};
use crate::time::{on_same_day, parse_time_of_day};

pub const SHORT_BREAK_NAME: &str = "Short Break";
pub const LONG_BREAK_NAME: &str = "Long Break";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub short_break_minutes: i64,
    pub long_break_minutes: i64,
    pub max_segment_minutes: i64,
    /// Accumulated work that triggers a long break.
    pub long_break_after_minutes: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            short_break_minutes: 10,
            long_break_minutes: 45,
            max_segment_minutes: 45,
            long_break_after_minutes: 180,
        }
    }
}

/// Scheduling constants that would produce overlapping or empty entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_segment_minutes must be positive, got {0}")]
    NonPositiveSegment(i64),

    #[error("{field} must not be negative, got {minutes}")]
    NegativeBreak { field: &'static str, minutes: i64 },

    #[error("long_break_after_minutes must be positive, got {0}")]
    NonPositiveThreshold(i64),
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_segment_minutes <= 0 {
            return Err(ConfigError::NonPositiveSegment(self.max_segment_minutes));
        }
        if self.short_break_minutes < 0 {
            return Err(ConfigError::NegativeBreak {
                field: "short_break_minutes",
                minutes: self.short_break_minutes,
            });
        }
        if self.long_break_minutes < 0 {
            return Err(ConfigError::NegativeBreak {
                field: "long_break_minutes",
                minutes: self.long_break_minutes,
            });
        }
        if self.long_break_after_minutes <= 0 {
            return Err(ConfigError::NonPositiveThreshold(
                self.long_break_after_minutes,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakKind {
    Short,
    Long,
}

/// Builds schedules. Owns the counter that names break entries, so break
/// ids stay unique across every schedule one instance produces.
#[derive(Debug, Default)]
pub struct Scheduler {
    config: ScheduleConfig,
    break_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler with custom constants, rejected unless they pass
    /// [`ScheduleConfig::validate`].
    pub fn try_with_config(config: ScheduleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            break_seq: 0,
        })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Same as [`Scheduler::create_schedule`], starting from the current
    /// wall clock in `tz`.
    pub fn create_schedule_now(
        &mut self,
        tasks: &[Task],
        tz: Tz,
    ) -> Result<Vec<ScheduledTask>, TaskError> {
        self.create_schedule(tasks, Utc::now().with_timezone(&tz))
    }

    /// Lay `tasks` out on a timeline beginning at `start`.
    ///
    /// Every task is validated up front; the first invalid one is returned
    /// and nothing is scheduled. A timeline that would run past chrono's
    /// range fails with [`TaskError::OutOfRange`].
    pub fn create_schedule(
        &mut self,
        tasks: &[Task],
        start: DateTime<Tz>,
    ) -> Result<Vec<ScheduledTask>, TaskError> {
        for t in tasks {
            t.validate()?;
        }

        // Vec::sort_by_key is stable, so equal priorities keep input order.
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by_key(|t| t.priority);

        let cfg = self.config;
        let mut schedule: Vec<ScheduledTask> = Vec::new();
        let mut current = start;
        let mut work_since_long_break = 0;

        for task in ordered {
            let preferred = preferred_start_time(task);
            let mut remaining = task.duration;

            while remaining > 0 {
                let segment = remaining.min(cfg.max_segment_minutes);

                if work_since_long_break >= cfg.long_break_after_minutes {
                    let entry = self.break_entry(BreakKind::Long, current, task)?;
                    current = entry.end_time;
                    schedule.push(entry);
                    work_since_long_break = 0;
                }

                if let Some(time) = preferred {
                    match on_same_day(current, time) {
                        Some(at) if at > current => {
                            debug!(task = %task.id, from = %current, to = %at, "preferred start moves clock forward");
                            current = at;
                        }
                        Some(_) => {}
                        None => {
                            warn!(task = %task.id, %time, "preferred start does not exist on this day; ignoring");
                        }
                    }
                }

                if schedule.last().is_some_and(|e| !e.is_break) {
                    let entry = self.break_entry(BreakKind::Short, current, task)?;
                    current = entry.end_time;
                    schedule.push(entry);
                }

                let end = shifted(current, segment, task)?;
                schedule.push(ScheduledTask {
                    task: task.clone(),
                    start_time: current,
                    end_time: end,
                    is_break: false,
                    break_duration: None,
                });
                current = end;
                work_since_long_break += segment;
                remaining -= segment;
            }
        }

        debug!(
            tasks = tasks.len(),
            entries = schedule.len(),
            "schedule built"
        );
        Ok(schedule)
    }

    /// Break starting at `at`, placed ahead of a segment of `before`.
    fn break_entry(
        &mut self,
        kind: BreakKind,
        at: DateTime<Tz>,
        before: &Task,
    ) -> Result<ScheduledTask, TaskError> {
        let (name, minutes) = match kind {
            BreakKind::Short => (SHORT_BREAK_NAME, self.config.short_break_minutes),
            BreakKind::Long => (LONG_BREAK_NAME, self.config.long_break_minutes),
        };

        let end_time = shifted(at, minutes, before)?;
        self.break_seq += 1;
        let task = Task {
            id: format!("break-{}", self.break_seq),
            name: name.to_string(),
            description: None,
            duration: minutes,
            difficulty: Difficulty::Easy,
            priority: Priority::Low,
            preferred_time_window: None,
        };

        Ok(ScheduledTask {
            task,
            start_time: at,
            end_time,
            is_break: true,
            break_duration: Some(minutes),
        })
    }
}

fn shifted(at: DateTime<Tz>, minutes: i64, task: &Task) -> Result<DateTime<Tz>, TaskError> {
    Duration::try_minutes(minutes)
        .and_then(|d| at.checked_add_signed(d))
        .ok_or_else(|| TaskError::OutOfRange {
            id: task.id.clone(),
        })
}

/// Parse the task's preferred start, dropping hints that do not parse.
fn preferred_start_time(task: &Task) -> Option<chrono::NaiveTime> {
    let raw = task.preferred_start()?;
    match parse_time_of_day(raw) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(task = %task.id, error = %e, "ignoring preferred start");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nine_am() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2026, 2, 20, 9, 0, 0).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2026, 2, 20, h, m, 0).unwrap()
    }

    fn work_ids(schedule: &[ScheduledTask]) -> Vec<&str> {
        schedule
            .iter()
            .filter(|e| !e.is_break)
            .map(|e| e.id())
            .collect()
    }

    #[test]
    fn test_empty_input_gives_empty_schedule() {
        let out = Scheduler::new().create_schedule(&[], nine_am()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_short_task_has_no_breaks() {
        let t = Task::new("t1", "Flashcards")
            .with_duration(30)
            .with_priority(Priority::High);
        let out = Scheduler::new().create_schedule(&[t], nine_am()).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id(), "t1");
        assert_eq!(out[0].start_time, at(9, 0));
        assert_eq!(out[0].end_time, at(9, 30));
        assert!(!out[0].is_break);
    }

    #[test]
    fn test_long_task_is_split_with_short_break() {
        let t = Task::new("t1", "Essay").with_duration(90);
        let out = Scheduler::new().create_schedule(&[t], nine_am()).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!((out[0].start_time, out[0].end_time), (at(9, 0), at(9, 45)));
        assert!(out[1].is_break);
        assert_eq!(out[1].name(), SHORT_BREAK_NAME);
        assert_eq!(out[1].break_duration, Some(10));
        assert_eq!((out[1].start_time, out[1].end_time), (at(9, 45), at(9, 55)));
        assert_eq!((out[2].start_time, out[2].end_time), (at(9, 55), at(10, 40)));
    }

    #[test]
    fn test_last_segment_takes_remainder() {
        let t = Task::new("t1", "Lab report").with_duration(100);
        let out = Scheduler::new().create_schedule(&[t], nine_am()).unwrap();

        let lengths: Vec<i64> = out.iter().filter(|e| !e.is_break).map(|e| e.minutes()).collect();
        assert_eq!(lengths, vec![45, 45, 10]);
    }

    #[test]
    fn test_sorts_by_priority_and_keeps_ties_in_order() {
        let tasks = vec![
            Task::new("low", "a").with_priority(Priority::Low),
            Task::new("m1", "b").with_priority(Priority::Medium),
            Task::new("high", "c").with_priority(Priority::High),
            Task::new("m2", "d").with_priority(Priority::Medium),
        ];
        let out = Scheduler::new().create_schedule(&tasks, nine_am()).unwrap();
        assert_eq!(work_ids(&out), vec!["high", "m1", "m2", "low"]);
    }

    #[test]
    fn test_long_break_after_three_hours_of_work() {
        let tasks: Vec<Task> = (1..=4)
            .map(|i| {
                Task::new(format!("t{i}"), format!("task {i}"))
                    .with_duration(60)
                    .with_priority(Priority::High)
            })
            .collect();
        let out = Scheduler::new().create_schedule(&tasks, nine_am()).unwrap();

        let long: Vec<usize> = out
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name() == LONG_BREAK_NAME)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(long.len(), 1);

        // Work before the long break adds up to 180.
        let before: i64 = out[..long[0]]
            .iter()
            .filter(|e| !e.is_break)
            .map(|e| e.minutes())
            .sum();
        assert_eq!(before, 180);
        assert_eq!(out[long[0]].break_duration, Some(45));

        // The long break replaces the short one before the next segment.
        assert!(!out[long[0] + 1].is_break);
    }

    #[test]
    fn test_preferred_start_pulls_clock_forward_only() {
        let early = Task::new("early", "a")
            .with_priority(Priority::High)
            .with_preferred_start("7:00 AM");
        let late = Task::new("late", "b")
            .with_priority(Priority::Medium)
            .with_preferred_start("11:00 AM");
        let out = Scheduler::new()
            .create_schedule(&[late, early], nine_am())
            .unwrap();

        assert_eq!(out[0].id(), "early");
        assert_eq!(out[0].start_time, at(9, 0));

        // Short break sits right before the moved segment.
        assert!(out[1].is_break);
        assert_eq!(out[1].start_time, at(11, 0));
        assert_eq!(out[2].id(), "late");
        assert_eq!(out[2].start_time, at(11, 10));
    }

    #[test]
    fn test_unparseable_preferred_start_is_ignored() {
        let t = Task::new("t1", "a").with_preferred_start("whenever");
        let out = Scheduler::new().create_schedule(&[t], nine_am()).unwrap();
        assert_eq!(out[0].start_time, at(9, 0));
    }

    #[test]
    fn test_invalid_task_is_rejected_before_scheduling() {
        let tasks = vec![
            Task::new("ok", "a"),
            Task::new("bad", "b").with_duration(0),
        ];
        let err = Scheduler::new().create_schedule(&tasks, nine_am()).unwrap_err();
        assert_eq!(
            err,
            TaskError::NonPositiveDuration {
                id: "bad".into(),
                duration: 0
            }
        );
    }

    #[test]
    fn test_break_ids_are_unique_across_calls() {
        let mut s = Scheduler::new();
        let t = Task::new("t1", "a").with_duration(90);
        let a = s.create_schedule(std::slice::from_ref(&t), nine_am()).unwrap();
        let b = s.create_schedule(&[t], nine_am()).unwrap();
        assert_eq!(a[1].id(), "break-1");
        assert_eq!(b[1].id(), "break-2");
    }

    #[test]
    fn test_custom_config_changes_cadence() {
        let cfg = ScheduleConfig {
            short_break_minutes: 5,
            long_break_minutes: 30,
            max_segment_minutes: 25,
            long_break_after_minutes: 50,
        };
        let t = Task::new("t1", "a").with_duration(75);
        let out = Scheduler::try_with_config(cfg)
            .unwrap()
            .create_schedule(&[t], nine_am())
            .unwrap();

        let names: Vec<&str> = out.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", SHORT_BREAK_NAME, "a", LONG_BREAK_NAME, "a"]);
        assert_eq!(out.last().unwrap().end_time, at(10, 50));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let negative_break = ScheduleConfig {
            short_break_minutes: -20,
            ..ScheduleConfig::default()
        };
        assert_eq!(
            Scheduler::try_with_config(negative_break).unwrap_err(),
            ConfigError::NegativeBreak {
                field: "short_break_minutes",
                minutes: -20
            }
        );

        let zero_cap = ScheduleConfig {
            max_segment_minutes: 0,
            ..ScheduleConfig::default()
        };
        assert_eq!(
            Scheduler::try_with_config(zero_cap).unwrap_err(),
            ConfigError::NonPositiveSegment(0)
        );

        let zero_threshold = ScheduleConfig {
            long_break_after_minutes: 0,
            ..ScheduleConfig::default()
        };
        assert_eq!(
            zero_threshold.validate().unwrap_err().to_string(),
            "long_break_after_minutes must be positive, got 0"
        );
    }

    #[test]
    fn test_out_of_range_duration_is_an_error() {
        let t = Task::new("huge", "a").with_duration(i64::MAX);
        let cfg = ScheduleConfig {
            max_segment_minutes: i64::MAX,
            ..ScheduleConfig::default()
        };
        let err = Scheduler::try_with_config(cfg)
            .unwrap()
            .create_schedule(&[t], nine_am())
            .unwrap_err();
        assert_eq!(err, TaskError::OutOfRange { id: "huge".into() });
    }

    #[test]
    fn test_out_of_range_break_is_an_error() {
        let cfg = ScheduleConfig {
            short_break_minutes: i64::MAX,
            ..ScheduleConfig::default()
        };
        let tasks = vec![Task::new("t1", "a"), Task::new("t2", "b")];
        let err = Scheduler::try_with_config(cfg)
            .unwrap()
            .create_schedule(&tasks, nine_am())
            .unwrap_err();
        assert_eq!(err, TaskError::OutOfRange { id: "t2".into() });
    }
}
