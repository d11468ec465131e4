// ============================================================================
// Error model
// ============================================================================
// One error enum for the whole engine: validation errors fail fast before
// model construction; solver outcomes other than a clean solve
// (INFEASIBLE/TIMEOUT/MODEL_INVALID) are reported as part of a normal
// `ScheduleResponse`, never as an `Err` here — see `SolverFailure`'s doc.
// ============================================================================

use crate::model::response::SolverStatus;

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Malformed input: bad dates, inverted ranges, non-positive counts,
    /// empty lecturer/room/slot/day sets.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A course's total sessions cannot fit within the semester even at
    /// `maxSessionsPerWeekAllowed` sessions per week.
    #[error("course {course_id} cannot fit {total_sessions} sessions into {available_weeks} semester weeks at up to {max_sessions_per_week} sessions/week")]
    CourseDoesNotFit {
        course_id: String,
        total_sessions: u32,
        available_weeks: u32,
        max_sessions_per_week: u32,
    },

    /// A course's `potentialLecturerIds` is empty or names no known
    /// lecturer.
    #[error("course {course_id} has no eligible lecturer")]
    NoEligibleLecturer { course_id: String },

    /// Every candidate calendar slot was removed by the holiday/day-of-week
    /// filter.
    #[error("no active calendar slot survives holiday and day-of-week filtering")]
    EmptyCalendar,

    /// One of the dense resource categories (lecturers, rooms, time-slots,
    /// days) is empty.
    #[error("resource category '{0}' is empty")]
    EmptyResource(&'static str),

    /// `semesterEndDate` is not strictly after `semesterStartDate`.
    #[error("semester end date must be strictly after the start date")]
    InvalidDateRange,

    /// The solver reached a terminal, non-solved state. Carried inside a
    /// `ScheduleResponse` by `crate::schedule`, not surfaced as an `Err` —
    /// callers inspect `ScheduleResponse::solver_status` instead, so this
    /// variant exists for completeness and for callers who build their own
    /// response from a lower-level solver invocation.
    #[error("solver terminated as {status:?}: {message}")]
    SolverFailure {
        status: SolverStatus,
        message: String,
    },

    /// A builder invariant was violated; indicates a bug in this crate
    /// rather than a problem with the caller's input.
    #[error("internal error: {0}")]
    InternalError(String),
}
