//! Export a schedule as a minimal iCalendar document.

use chrono::Utc;

use crate::task::ScheduledTask;

/// Emit a VCALENDAR with one VEVENT per schedule entry.
///
/// Notes:
/// - DTSTART/DTEND are UTC.
/// - UIDs combine the entry id with its start, since work segments of one
///   task share an id.
pub fn events_to_ics(schedule: &[ScheduledTask]) -> String {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//Studyplan//EN\n");

    for e in schedule {
        let start = e.start_time.with_timezone(&Utc);
        let end = e.end_time.with_timezone(&Utc);
        let dtstart = start.format("%Y%m%dT%H%M%SZ");

        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!("UID:{}-{}@studyplan\n", e.id(), dtstart));
        s.push_str(&format!("DTSTART:{}\n", dtstart));
        s.push_str(&format!("DTEND:{}\n", end.format("%Y%m%dT%H%M%SZ")));
        s.push_str(&format!("SUMMARY:{}\n", escape_ics(e.name())));
        s.push_str(&format!("DESCRIPTION:{}\n", escape_ics(&describe(e))));
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    s
}

fn describe(e: &ScheduledTask) -> String {
    if e.is_break {
        return format!("Break: {} minutes\n", e.minutes());
    }
    let mut d = format!(
        "TaskId: {}\nPriority: {}\nDifficulty: {}\n",
        e.id(),
        e.task.priority,
        e.task.difficulty
    );
    if let Some(desc) = &e.task.description {
        d.push_str(desc);
        d.push('\n');
    }
    d
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
