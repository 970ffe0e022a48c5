//! Plain-text rendering of a schedule, one line per entry.

use crate::task::ScheduledTask;
use crate::time::format_clock;

pub fn format_entry(entry: &ScheduledTask) -> String {
    let range = format!(
        "{} - {}",
        format_clock(entry.start_time),
        format_clock(entry.end_time)
    );
    if entry.is_break {
        let minutes = entry.break_duration.unwrap_or_else(|| entry.minutes());
        return format!("{range}: {} ({minutes} minutes)", entry.name());
    }
    format!(
        "{range}: {} ({}, {} priority)",
        entry.name(),
        entry.task.difficulty,
        entry.task.priority
    )
}

pub fn format_schedule(schedule: &[ScheduledTask]) -> String {
    schedule
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Scheduler;
    use crate::task::{Difficulty, Priority, Task};
    use chrono::TimeZone;

    #[test]
    fn test_renders_work_and_break_lines() {
        let start = chrono_tz::America::Chicago
            .with_ymd_and_hms(2026, 2, 20, 9, 0, 0)
            .unwrap();
        let t = Task::new("t1", "Essay")
            .with_duration(90)
            .with_difficulty(Difficulty::Hard)
            .with_priority(Priority::High);
        let schedule = Scheduler::new().create_schedule(&[t], start).unwrap();

        assert_eq!(
            format_schedule(&schedule),
            "9:00 AM - 9:45 AM: Essay (hard, high priority)\n\
             9:45 AM - 9:55 AM: Short Break (10 minutes)\n\
             9:55 AM - 10:40 AM: Essay (hard, high priority)"
        );
    }

    #[test]
    fn test_empty_schedule_renders_empty_string() {
        assert_eq!(format_schedule(&[]), "");
    }
}
