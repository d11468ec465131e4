// ============================================================================
// Campus timetable scheduling engine
// ============================================================================
// Computes a feasible, optimized class timetable for one academic semester.
// `schedule()` is the single entry point: resource registry and calendar
// indexer, course preprocessor, occupancy compiler, solver, result decoder,
// run once per request and dropped on return.
//
// Main modules:
// - calendar, registry    : dense calendar/resource indexing
// - preprocess, occupancy : course splitting and forbidden-slot compilation
// - solver                : constraint model, search, and the weighted objective
// - decode                : solved assignment -> response DTOs
// - commands              : thin Tauri command surface over the core
// ============================================================================

pub mod calendar;
pub mod commands;
pub mod decode;
pub mod error;
pub mod logging;
pub mod model;
pub mod occupancy;
pub mod preprocess;
pub mod registry;
pub mod solver;

use std::time::{Duration, Instant};

use tracing::info;

pub use error::{Result, ScheduleError};
pub use model::request::{ObjectiveTerm, ScheduleRequest};
pub use model::response::{ScheduleResponse, SolverStatus};

use calendar::CalendarIndex;
use model::response::LecturerLoadEntry;
use registry::ResourceRegistry;
use solver::SolverConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Runs the scheduling pipeline once for `request`. Validation failures —
/// bad dates, an empty resource category, a course that cannot fit the
/// semester, a course with no eligible lecturer — propagate as `Err` before
/// any model is built. A solver outcome other than a clean solve
/// (`INFEASIBLE`/`TIMEOUT`) comes back as `Ok` with an empty schedule and
/// the matching `solverStatus`, never as an error.
pub fn schedule(request: ScheduleRequest) -> Result<ScheduleResponse> {
    let start = Instant::now();
    info!(
        semester = %request.semester_id,
        courses = request.courses.len(),
        lecturers = request.lecturers.len(),
        rooms = request.rooms.len(),
        "scheduling request received"
    );

    let registry = ResourceRegistry::build(&request.lecturers, &request.rooms, &request.time_slots)?;
    let semester = request.calendar();
    let calendar = CalendarIndex::build(
        semester.start_date,
        semester.end_date,
        &request.days_of_week,
        registry.num_time_slots() as u32,
        &semester.holidays,
    )?;

    let preprocessed = preprocess::preprocess_courses(
        &request.courses,
        &registry,
        calendar.total_weeks,
        request.group_size_target,
        request.max_sessions_per_week_allowed,
    )?;
    let total_original_sessions: u32 = preprocessed.courses.iter().map(|c| c.total_sessions).sum();

    let occupancy_index = occupancy::compile_occupancy(
        &calendar,
        &registry,
        &request.existing_schedules,
        &request.occupied_slots,
    );

    let feasible_only = request.is_feasible_only();
    let solver_config = SolverConfig {
        time_limit: Duration::from_secs(request.solver_time_limit_seconds),
        balance_load: !feasible_only && request.wants(ObjectiveTerm::BalanceLoad),
        early_start: !feasible_only && request.wants(ObjectiveTerm::EarlyStart),
        compact_schedule: !feasible_only && request.wants(ObjectiveTerm::CompactSchedule),
        optimize_room_fit: !feasible_only && request.wants(ObjectiveTerm::OptimizeRoomFit),
        group_size_target: request.group_size_target,
    };
    solver_config.validate()?;

    let outcome = solver::solve(
        &preprocessed.groups,
        &calendar,
        &registry,
        &occupancy_index,
        &solver_config,
    );

    let (scheduled_courses, lecturer_load, load_difference) = match outcome.status {
        SolverStatus::Optimal | SolverStatus::Feasible => decode::decode(
            &preprocessed.courses,
            &preprocessed.groups,
            &preprocessed.sessions,
            &outcome.assignments,
            &calendar,
            &registry,
        ),
        _ => (
            Vec::new(),
            (0..registry.num_lecturers())
                .map(|idx| LecturerLoadEntry {
                    lecturer_id: registry.lecturer_id(idx).to_string(),
                    sessions_assigned: 0,
                })
                .collect(),
            0,
        ),
    };

    let solver_duration_seconds = start.elapsed().as_secs_f64();
    info!(
        status = ?outcome.status,
        duration_ms = start.elapsed().as_millis(),
        "scheduling request complete"
    );

    Ok(ScheduleResponse {
        semester_id: request.semester_id,
        semester_start_date: request.semester_start_date,
        semester_end_date: request.semester_end_date,
        scheduled_courses,
        lecturer_load,
        load_difference,
        total_original_sessions_to_schedule: total_original_sessions,
        solver_duration_seconds,
        solver_status: outcome.status,
        solver_message: outcome.message,
    })
}
