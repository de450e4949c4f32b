use chrono::NaiveDate;
use tracing::warn;

use crate::calendar::count_weekday_occurrences;
use crate::records::Group;
use crate::types::CourseDay;

/// theoretical meeting count for a group over a date window
///
/// schedule-based only; the attendance subsystem's recorded check-ins play no
/// part here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingProjection {
    /// weekday resolved, this many meetings fall inside the window
    Scheduled(u32),
    /// the group carries no recognizable weekday; billable count is zero
    UnknownSchedule,
}

impl MeetingProjection {
    /// meeting count used for billing, zero when the schedule is unknown
    pub fn billable_count(&self) -> u32 {
        match self {
            MeetingProjection::Scheduled(count) => *count,
            MeetingProjection::UnknownSchedule => 0,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, MeetingProjection::Scheduled(_))
    }
}

/// project meetings for `group` from `start` to `end` inclusive
///
/// a missing or unrecognized day name is a typed soft-fail, not an error, so
/// one bad group record never aborts a batch calculation
pub fn project_meetings(group: &Group, start: NaiveDate, end: NaiveDate) -> MeetingProjection {
    let day_name = match group.day_of_week.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            warn!(group_id = group.id, group = %group.name, "course day not set, projecting zero meetings");
            return MeetingProjection::UnknownSchedule;
        }
    };

    let course_day = match CourseDay::from_name(day_name) {
        Some(day) => day,
        None => {
            warn!(group_id = group.id, group = %group.name, day = %day_name, "unrecognized course day, projecting zero meetings");
            return MeetingProjection::UnknownSchedule;
        }
    };

    MeetingProjection::Scheduled(count_weekday_occurrences(course_day.weekday(), start, end))
}
