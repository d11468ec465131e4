// ============================================================================
// Local search improvement pass
// ============================================================================
// Once backtracking finds one feasible assignment, repeatedly applies
// feasibility-preserving moves that strictly lower the weighted objective:
// reassigning a group's lecturer to rebalance load, and reassigning a weekly
// meeting's room to tighten room-size fit. Runs to a fixed point or until
// the wall-clock budget is spent — never trades away feasibility for a
// better score.
// ============================================================================

use std::time::Instant;

use tracing::debug;

use crate::calendar::CalendarIndex;
use crate::model::internal::{GlobalSlot, GroupSpec};
use crate::occupancy::OccupancyIndex;
use crate::registry::ResourceRegistry;

use super::model::{enumerate_slots, GroupAssignment, UsageTracker};
use super::SolverConfig;

pub const LOAD_IMBALANCE_WEIGHT: i64 = 10;
pub const EARLY_START_WEIGHT: i64 = 1;
pub const COMPACTNESS_WEIGHT: i64 = 20;
pub const ROOM_FIT_WEIGHT: i64 = 5;

/// Runs improvement passes until none finds a move, or `deadline` passes.
/// Returns `true` if it converged to a fixed point before the deadline.
pub fn improve(
    assignments: &mut [GroupAssignment],
    groups: &[GroupSpec],
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
    occupancy: &OccupancyIndex,
    config: &SolverConfig,
    deadline: Instant,
) -> bool {
    let mut tracker = UsageTracker::new(registry.num_lecturers(), registry.num_rooms());
    tracker.rebuild(assignments, groups, calendar);

    loop {
        if Instant::now() >= deadline {
            return false;
        }
        let mut improved = false;
        if config.balance_load {
            improved |= balance_load_pass(assignments, groups, calendar, registry, occupancy, config, &mut tracker, deadline);
        }
        if Instant::now() >= deadline {
            return false;
        }
        if config.optimize_room_fit {
            improved |= room_fit_pass(assignments, groups, calendar, registry, occupancy, config, &mut tracker, deadline);
        }
        if !improved {
            return true;
        }
    }
}

pub fn total_cost(
    assignments: &[GroupAssignment],
    groups: &[GroupSpec],
    registry: &ResourceRegistry,
    calendar: &CalendarIndex,
    config: &SolverConfig,
) -> i64 {
    let mut cost = 0i64;

    if config.balance_load {
        let loads = lecturer_loads(assignments, groups, registry.num_lecturers());
        // Only lecturers eligible for at least one scheduled group count
        // toward the imbalance: a lecturer the request never makes eligible
        // for anything is not part of the pool being balanced, but an
        // eligible-and-idle lecturer (load 0) is exactly the imbalance this
        // term exists to penalize.
        let relevant: std::collections::HashSet<usize> = groups
            .iter()
            .flat_map(|g| g.eligible_lecturers.iter().copied())
            .collect();
        let max = relevant.iter().map(|&l| loads[l]).max().unwrap_or(0);
        let min = relevant.iter().map(|&l| loads[l]).min().unwrap_or(0);
        cost += LOAD_IMBALANCE_WEIGHT * (max as i64 - min as i64);
    }

    if config.early_start {
        let sum: i64 = assignments
            .iter()
            .filter_map(|a| enumerate_slots(&groups[a.group_idx], a, calendar))
            .flat_map(|(lecturer_slots, _)| lecturer_slots.into_iter())
            .map(|GlobalSlot(v)| v as i64)
            .sum();
        cost += EARLY_START_WEIGHT * sum;
    }

    if config.compact_schedule {
        let sum: i64 = groups
            .iter()
            .filter(|g| g.sessions_per_week > 1 || g.course_weeks > 1)
            .map(|g| g.course_weeks.saturating_sub(1) as i64)
            .sum();
        cost += COMPACTNESS_WEIGHT * sum;
    }

    if config.optimize_room_fit {
        let sum: i64 = assignments
            .iter()
            .flat_map(|a| a.weekly.iter())
            .map(|w| {
                (registry.capacities_by_room_index[w.room_idx] as i64 - config.group_size_target as i64).abs()
            })
            .sum();
        cost += ROOM_FIT_WEIGHT * sum;
    }

    cost
}

fn lecturer_loads(assignments: &[GroupAssignment], groups: &[GroupSpec], num_lecturers: usize) -> Vec<u32> {
    let mut load = vec![0u32; num_lecturers];
    for assignment in assignments {
        let group = &groups[assignment.group_idx];
        load[assignment.lecturer_idx] += group.sessions_per_week * group.course_weeks;
    }
    load
}

fn balance_load_pass(
    assignments: &mut [GroupAssignment],
    groups: &[GroupSpec],
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
    occupancy: &OccupancyIndex,
    config: &SolverConfig,
    tracker: &mut UsageTracker,
    deadline: Instant,
) -> bool {
    let mut improved = false;
    for idx in 0..assignments.len() {
        if Instant::now() >= deadline {
            break;
        }
        let group = &groups[assignments[idx].group_idx];
        let current_lecturer = assignments[idx].lecturer_idx;
        let Some((lecturer_slots, _)) = enumerate_slots(group, &assignments[idx], calendar) else {
            continue;
        };

        let before = total_cost(assignments, groups, registry, calendar, config);
        let mut applied = false;
        for &candidate_lecturer in &group.eligible_lecturers {
            if candidate_lecturer == current_lecturer {
                continue;
            }
            if !lecturer_slots
                .iter()
                .all(|&slot| tracker.lecturer_free(occupancy, candidate_lecturer, slot))
            {
                continue;
            }

            tracker.release(current_lecturer, &lecturer_slots, &[]);
            assignments[idx].lecturer_idx = candidate_lecturer;
            tracker.commit(candidate_lecturer, &lecturer_slots, &[]);

            let after = total_cost(assignments, groups, registry, calendar, config);
            if after < before {
                applied = true;
                break;
            }
            tracker.release(candidate_lecturer, &lecturer_slots, &[]);
            assignments[idx].lecturer_idx = current_lecturer;
            tracker.commit(current_lecturer, &lecturer_slots, &[]);
        }
        if applied {
            improved = true;
            debug!(group = idx, "reassigned lecturer to reduce load imbalance");
        }
    }
    improved
}

fn room_fit_pass(
    assignments: &mut [GroupAssignment],
    groups: &[GroupSpec],
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
    occupancy: &OccupancyIndex,
    config: &SolverConfig,
    tracker: &mut UsageTracker,
    deadline: Instant,
) -> bool {
    let mut improved = false;
    for idx in 0..assignments.len() {
        if Instant::now() >= deadline {
            break;
        }
        let group_idx = assignments[idx].group_idx;
        let group_course_weeks = groups[group_idx].course_weeks;
        let group_student_count = groups[group_idx].student_count;

        for slot_idx in 0..assignments[idx].weekly.len() {
            if Instant::now() >= deadline {
                break;
            }
            let weekly = assignments[idx].weekly[slot_idx];
            let start_week = assignments[idx].start_week;
            let weeks: Vec<GlobalSlot> = (0..group_course_weeks)
                .filter_map(|w| calendar.slot(start_week + w, weekly.day_idx, weekly.shift_idx))
                .collect();
            if weeks.len() as u32 != group_course_weeks {
                continue;
            }

            let before = total_cost(assignments, groups, registry, calendar, config);
            let lecturer_idx = assignments[idx].lecturer_idx;
            let mut applied = false;

            for room_idx in 0..registry.num_rooms() {
                if room_idx == weekly.room_idx {
                    continue;
                }
                if registry.capacities_by_room_index[room_idx] < group_student_count {
                    continue;
                }
                if !weeks.iter().all(|&slot| tracker.room_free(occupancy, room_idx, slot)) {
                    continue;
                }

                let new_room_slots: Vec<_> = weeks.iter().map(|&s| (room_idx, s)).collect();
                let old_room_slots: Vec<_> = weeks.iter().map(|&s| (weekly.room_idx, s)).collect();

                tracker.release(lecturer_idx, &[], &old_room_slots);
                assignments[idx].weekly[slot_idx].room_idx = room_idx;
                tracker.commit(lecturer_idx, &[], &new_room_slots);

                let after = total_cost(assignments, groups, registry, calendar, config);
                if after < before {
                    applied = true;
                    break;
                }
                tracker.release(lecturer_idx, &[], &new_room_slots);
                assignments[idx].weekly[slot_idx].room_idx = weekly.room_idx;
                tracker.commit(lecturer_idx, &[], &old_room_slots);
            }
            if applied {
                improved = true;
                debug!(group = idx, slot = slot_idx, "reassigned room to tighten room-size fit");
            }
        }
    }
    improved
}
