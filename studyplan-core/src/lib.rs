//! studyplan-core: focus-session scheduling for study tasks.
//!
//! Tasks go in unordered; a timeline of work segments and breaks comes out.
//! Nothing here touches the network or disk.

pub mod adjust;
pub mod calendar;
pub mod format;
pub mod record;
pub mod schedule;
pub mod task;
pub mod time;

pub use adjust::{adjust_schedule, ScheduleAdjustment};
pub use calendar::events_to_ics;
pub use format::{format_entry, format_schedule};
pub use record::{tasks_from_records, RecordDifficulty, RecordStatus, TaskRecord, TaskType};
pub use schedule::{ConfigError, ScheduleConfig, Scheduler, LONG_BREAK_NAME, SHORT_BREAK_NAME};
pub use task::{Difficulty, PreferredTimeWindow, Priority, ScheduledTask, Task, TaskError};
pub use time::{format_clock, format_time_of_day, parse_local_start, parse_time_of_day, parse_timezone};
