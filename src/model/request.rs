// ============================================================================
// Request DTOs — crate boundary
// ============================================================================
// Field names are camelCase over the wire to match the external contract,
// snake_case in Rust.
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Uppercase English day name. Derived ordering follows declaration order
/// (Monday < ... < Sunday); the response ordering contract does not use it —
/// weekly schedule details are sorted by the request's own `daysOfWeek`
/// position instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayName {
    /// The day name chrono assigns to `date`'s weekday.
    pub fn from_chrono(date: NaiveDate) -> Self {
        use chrono::Datelike;
        match date.weekday() {
            chrono::Weekday::Mon => DayName::Monday,
            chrono::Weekday::Tue => DayName::Tuesday,
            chrono::Weekday::Wed => DayName::Wednesday,
            chrono::Weekday::Thu => DayName::Thursday,
            chrono::Weekday::Fri => DayName::Friday,
            chrono::Weekday::Sat => DayName::Saturday,
            chrono::Weekday::Sun => DayName::Sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    Room,
    Lecturer,
}

/// A single weighted term of the objective, or the `FEASIBLE_ONLY` marker
/// that clears the objective entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveTerm {
    BalanceLoad,
    EarlyStart,
    CompactSchedule,
    OptimizeRoomFit,
    FeasibleOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub credits: u32,
    pub total_semester_sessions: u32,
    pub registered_students: u32,
    pub potential_lecturer_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub label: String,
    pub capacity: u32,
    #[serde(default)]
    pub room_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub shift: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterCalendar {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub holidays: HashSet<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingScheduleRecord {
    pub room_id: String,
    pub lecturer_id: String,
    pub time_slot_id: String,
    pub day_of_week: DayName,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedResourceSlot {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub date: NaiveDate,
    pub time_slot_id: String,
}

fn default_group_size_target() -> u32 {
    60
}

fn default_max_sessions_per_week() -> u32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub semester_id: String,
    pub semester_start_date: NaiveDate,
    pub semester_end_date: NaiveDate,
    pub courses: Vec<Course>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    pub time_slots: Vec<TimeSlot>,
    pub days_of_week: Vec<DayName>,
    #[serde(default)]
    pub exception_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub occupied_slots: Vec<OccupiedResourceSlot>,
    #[serde(default)]
    pub existing_schedules: Vec<ExistingScheduleRecord>,
    #[serde(default = "default_group_size_target")]
    pub group_size_target: u32,
    #[serde(default = "default_max_sessions_per_week")]
    pub max_sessions_per_week_allowed: u32,
    pub solver_time_limit_seconds: u64,
    #[serde(default)]
    pub objective_strategy: Vec<ObjectiveTerm>,
}

impl ScheduleRequest {
    pub fn wants(&self, term: ObjectiveTerm) -> bool {
        self.objective_strategy.contains(&term)
    }

    /// `FEASIBLE_ONLY` overrides every other term. An empty strategy list
    /// also means pure feasibility — there's no active term to optimize.
    pub fn is_feasible_only(&self) -> bool {
        self.objective_strategy.is_empty() || self.wants(ObjectiveTerm::FeasibleOnly)
    }

    pub fn calendar(&self) -> SemesterCalendar {
        SemesterCalendar {
            start_date: self.semester_start_date,
            end_date: self.semester_end_date,
            holidays: self.exception_dates.iter().copied().collect(),
        }
    }
}
