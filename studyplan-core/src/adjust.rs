//! Local repair of a schedule when one task's actual duration differs from
//! the plan.
//!
//! Only the matched task is resized; everything after it keeps its own
//! length and is shifted onto the new end. Priority order and break
//! placement are not re-derived, so a long break may end up earlier or
//! later than the work threshold that produced it.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::task::ScheduledTask;
use crate::time::format_clock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAdjustment {
    pub new_schedule: Vec<ScheduledTask>,
    /// User-facing descriptions of what moved.
    pub adjustments: Vec<String>,
}

impl ScheduleAdjustment {
    fn unchanged(schedule: &[ScheduledTask]) -> Self {
        Self {
            new_schedule: schedule.to_vec(),
            adjustments: Vec::new(),
        }
    }
}

/// `at + minutes`, or `None` when either step leaves chrono's range.
fn shifted(at: DateTime<Tz>, minutes: i64) -> Option<DateTime<Tz>> {
    at.checked_add_signed(Duration::try_minutes(minutes)?)
}

/// Resize the first work entry with id `task_id` to `actual_minutes` and
/// cascade the difference through every later entry.
///
/// Unknown ids, a zero difference, negative durations and durations that
/// push past the representable time range all return the input unchanged
/// with no adjustments.
pub fn adjust_schedule(
    schedule: &[ScheduledTask],
    task_id: &str,
    actual_minutes: i64,
) -> ScheduleAdjustment {
    let Some(idx) = schedule
        .iter()
        .position(|e| e.id() == task_id && !e.is_break)
    else {
        debug!(task = task_id, "no work entry with this id; nothing to adjust");
        return ScheduleAdjustment::unchanged(schedule);
    };

    if actual_minutes < 0 {
        warn!(task = task_id, actual_minutes, "negative actual duration; ignoring");
        return ScheduleAdjustment::unchanged(schedule);
    }

    let planned = schedule[idx].minutes();
    let diff = actual_minutes - planned;
    if diff == 0 {
        return ScheduleAdjustment::unchanged(schedule);
    }

    let mut new_schedule = schedule.to_vec();
    let mut adjustments = Vec::new();

    let matched = &mut new_schedule[idx];
    let Some(end) = shifted(matched.start_time, actual_minutes) else {
        warn!(task = task_id, actual_minutes, "actual duration out of range; ignoring");
        return ScheduleAdjustment::unchanged(schedule);
    };
    matched.end_time = end;
    let mut cursor = end;

    for entry in new_schedule.iter_mut().skip(idx + 1) {
        let minutes = entry.minutes();
        let Some(end) = shifted(cursor, minutes) else {
            warn!(task = task_id, actual_minutes, "cascade runs out of range; ignoring");
            return ScheduleAdjustment::unchanged(schedule);
        };
        entry.start_time = cursor;
        entry.end_time = end;
        cursor = end;

        if !entry.is_break {
            adjustments.push(format!(
                "Task \"{}\" moved to {}",
                entry.name(),
                format_clock(entry.start_time)
            ));
        }
    }

    debug!(
        task = task_id,
        planned,
        actual = actual_minutes,
        shifted = adjustments.len(),
        "schedule adjusted"
    );

    ScheduleAdjustment {
        new_schedule,
        adjustments,
    }
}
