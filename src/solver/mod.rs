// ============================================================================
// Solver
// ============================================================================
// A constraint model and driver without a CP-SAT binding: `search` performs
// the backtracking placement a hand-rolled constraint solver would,
// `improve` runs the local-search pass a swap suggester would, and this
// module runs the `BUILDING -> SOLVING -> {OPTIMAL, FEASIBLE, INFEASIBLE,
// TIMEOUT}` state machine over both. `MODEL_INVALID` is not reachable from
// here — it would indicate a builder bug, not a solver outcome, and this
// crate's builder only ever emits well-formed candidates.
// ============================================================================

mod improve;
mod model;
mod search;

use std::time::{Duration, Instant};

use tracing::{info, warn};

pub use model::{GroupAssignment, WeeklySlot};

use crate::calendar::CalendarIndex;
use crate::model::internal::GroupSpec;
use crate::model::response::SolverStatus;
use crate::occupancy::OccupancyIndex;
use crate::registry::ResourceRegistry;

/// Solver parameters: a wall-clock budget and which objective terms are
/// active. Single-threaded, no random seed — determinism is a contract, not
/// a default.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub time_limit: Duration,
    pub balance_load: bool,
    pub early_start: bool,
    pub compact_schedule: bool,
    pub optimize_room_fit: bool,
    pub group_size_target: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            balance_load: false,
            early_start: false,
            compact_schedule: false,
            optimize_room_fit: false,
            group_size_target: 60,
        }
    }
}

impl SolverConfig {
    pub fn wants_objective(&self) -> bool {
        self.balance_load || self.early_start || self.compact_schedule || self.optimize_room_fit
    }

    /// Rejects configurations `solve` could not act on sensibly: a zero
    /// time limit (the search would never run) or a zero group-size target
    /// (every room-fit term would divide by a meaningless denominator).
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.time_limit.is_zero() {
            return Err(crate::error::ScheduleError::InvalidInput(
                "solver time limit must be greater than zero".to_string(),
            ));
        }
        if self.group_size_target == 0 {
            return Err(crate::error::ScheduleError::InvalidInput(
                "group size target must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct SolveOutcome {
    pub status: SolverStatus,
    pub message: String,
    pub assignments: Vec<GroupAssignment>,
}

/// Runs the solver to completion or until `config.time_limit` elapses.
pub fn solve(
    groups: &[GroupSpec],
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
    occupancy: &OccupancyIndex,
    config: &SolverConfig,
) -> SolveOutcome {
    if groups.is_empty() {
        return SolveOutcome {
            status: SolverStatus::NoSessionsToSchedule,
            message: "no class groups to schedule".to_string(),
            assignments: Vec::new(),
        };
    }

    let deadline = Instant::now() + config.time_limit;
    let state = search::SearchState::new(groups, calendar, registry, occupancy, deadline);

    match state.run() {
        search::SearchOutcome::Solved(mut assignments) => {
            let converged = if config.wants_objective() {
                improve::improve(&mut assignments, groups, calendar, registry, occupancy, config, deadline)
            } else {
                true
            };
            let status = if converged {
                SolverStatus::Optimal
            } else {
                SolverStatus::Feasible
            };
            info!(groups = assignments.len(), ?status, "solver produced an assignment");
            SolveOutcome {
                status,
                message: "solved".to_string(),
                assignments,
            }
        }
        search::SearchOutcome::Infeasible => {
            warn!("no assignment satisfies every hard constraint");
            SolveOutcome {
                status: SolverStatus::Infeasible,
                message: "no assignment satisfies every hard constraint given these resources".to_string(),
                assignments: Vec::new(),
            }
        }
        search::SearchOutcome::TimedOut => {
            warn!(limit = ?config.time_limit, "solver exceeded its wall-clock budget");
            SolveOutcome {
                status: SolverStatus::Timeout,
                message: "wall-clock limit reached before a feasible assignment was found".to_string(),
                assignments: Vec::new(),
            }
        }
    }
}
