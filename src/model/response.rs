// ============================================================================
// Response DTOs — crate boundary
// ============================================================================
// camelCase over the wire, matching the request DTOs. Ordering guarantees
// are the Result Decoder's responsibility, not serde's: courses in input
// order, groups by groupNumber, weeklyScheduleDetails by (dayIdx, shiftIdx),
// dates ascending.
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::request::DayName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    Timeout,
    ModelInvalid,
    NoSessionsToSchedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleDetail {
    pub day_of_week: DayName,
    pub time_slot_id: String,
    pub room_id: String,
    pub scheduled_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledClassGroup {
    pub group_number: u32,
    pub max_students: u32,
    pub lecturer_id: String,
    pub group_start_date: NaiveDate,
    pub group_end_date: NaiveDate,
    pub total_teaching_weeks_for_group: u32,
    pub sessions_per_week_for_group: u32,
    pub weekly_schedule_details: Vec<WeeklyScheduleDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCourse {
    pub course_id: String,
    pub total_registered_students: u32,
    pub total_sessions_for_course: u32,
    pub scheduled_class_groups: Vec<ScheduledClassGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerLoadEntry {
    pub lecturer_id: String,
    pub sessions_assigned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub semester_id: String,
    pub semester_start_date: NaiveDate,
    pub semester_end_date: NaiveDate,
    pub scheduled_courses: Vec<ScheduledCourse>,
    pub lecturer_load: Vec<LecturerLoadEntry>,
    pub load_difference: u32,
    pub total_original_sessions_to_schedule: u32,
    pub solver_duration_seconds: f64,
    pub solver_status: SolverStatus,
    pub solver_message: String,
}
