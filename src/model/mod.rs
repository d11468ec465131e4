// ============================================================================
// Data model
// ============================================================================
// Three layers: request types cross the crate boundary as-is, internal types
// are owned by a single scheduling request and dropped when it returns,
// response types cross back out.
// ============================================================================

pub mod internal;
pub mod request;
pub mod response;

pub use internal::GlobalSlot;
pub use request::{
    Course, DayName, ExistingScheduleRecord, Lecturer, ObjectiveTerm, OccupiedResourceSlot, Room,
    ResourceKind, ScheduleRequest, SemesterCalendar, TimeSlot,
};
pub use response::{
    LecturerLoadEntry, ScheduleResponse, ScheduledClassGroup, ScheduledCourse, SolverStatus,
    WeeklyScheduleDetail,
};
