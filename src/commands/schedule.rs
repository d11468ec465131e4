// ============================================================================
// Tauri command surface
// ============================================================================
// Thin wrapper around `crate::schedule`: deserializes the request, logs
// request/response sizes, and maps `ScheduleError` to the string error Tauri
// sends back to the frontend.
// ============================================================================

use tracing::{info, warn};

use crate::{schedule, ScheduleRequest, ScheduleResponse};

/// Generates a timetable for one semester.
///
/// Validation failures (bad dates, an empty resource category, a course
/// that cannot fit the semester, a course with no eligible lecturer) come
/// back as `Err`. A solver outcome other than a clean solve is still `Ok`,
/// with `solverStatus` carrying `INFEASIBLE`/`TIMEOUT`/`NO_SESSIONS_TO_SCHEDULE`.
#[tauri::command]
pub fn generate_schedule(request: ScheduleRequest) -> Result<ScheduleResponse, String> {
    info!(
        semester = %request.semester_id,
        courses = request.courses.len(),
        "generate_schedule command received"
    );

    let response = schedule(request).map_err(|e| {
        warn!(error = %e, "generate_schedule failed");
        e.to_string()
    })?;

    info!(
        status = ?response.solver_status,
        scheduled_courses = response.scheduled_courses.len(),
        duration_seconds = response.solver_duration_seconds,
        "generate_schedule command complete"
    );

    Ok(response)
}
