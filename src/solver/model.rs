// ============================================================================
// Solver data model
// ============================================================================
// The decision-variable shapes from the spec's Constraint Model Builder,
// expressed as plain Rust structs instead of CP-SAT variables: a group's
// `start_week`/`lecturer`/per-weekly-meeting `(day, shift, room)` tuple, and a
// usage tracker standing in for the model's non-overlap constraints.
// ============================================================================

use std::collections::HashSet;

use crate::calendar::CalendarIndex;
use crate::model::internal::{GlobalSlot, GroupSpec, SessionSpec};
use crate::occupancy::OccupancyIndex;

/// One weekly-fixed (day, shift, room) tuple — one of a group's k meetings.
#[derive(Debug, Clone, Copy)]
pub struct WeeklySlot {
    pub day_idx: u32,
    pub shift_idx: u32,
    pub room_idx: usize,
}

/// `start_week[g]`, `lecturer[g]`, and the k weekly tuples for one group.
#[derive(Debug, Clone)]
pub struct GroupAssignment {
    pub group_idx: usize,
    pub lecturer_idx: usize,
    pub start_week: u32,
    pub weekly: Vec<WeeklySlot>,
}

impl GroupAssignment {
    /// The concrete global slot a session resolves to under this assignment.
    pub fn session_slot(&self, calendar: &CalendarIndex, session: &SessionSpec) -> GlobalSlot {
        let weekly = &self.weekly[session.intra_week_index as usize];
        calendar
            .slot(
                self.start_week + session.course_week_index,
                weekly.day_idx,
                weekly.shift_idx,
            )
            .expect("candidate generation only accepts weekly patterns active for every course week")
    }
}

/// Every concrete global slot an assignment's sessions occupy, paired with
/// the lecturer side and the (room, slot) side. `None` if the weekly pattern
/// does not have an active slot for one of the group's course weeks (a
/// holiday mid-run, typically) — candidate generation rejects such patterns
/// before they reach here, so a `None` surfacing later indicates a bug.
pub fn enumerate_slots(
    group: &GroupSpec,
    assignment: &GroupAssignment,
    calendar: &CalendarIndex,
) -> Option<(Vec<GlobalSlot>, Vec<(usize, GlobalSlot)>)> {
    let total = (group.course_weeks * group.sessions_per_week) as usize;
    let mut lecturer_slots = Vec::with_capacity(total);
    let mut room_slots = Vec::with_capacity(total);
    for w in 0..group.course_weeks {
        for weekly in &assignment.weekly {
            let slot = calendar.slot(assignment.start_week + w, weekly.day_idx, weekly.shift_idx)?;
            lecturer_slots.push(slot);
            room_slots.push((weekly.room_idx, slot));
        }
    }
    Some((lecturer_slots, room_slots))
}

/// Committed (lecturer, slot) and (room, slot) pairs from already-placed
/// groups, layered over the externally-compiled occupancy. Stands in for the
/// model's `AddNoOverlap2D`-style non-overlap constraints.
#[derive(Debug)]
pub struct UsageTracker {
    lecturer_used: Vec<HashSet<GlobalSlot>>,
    room_used: Vec<HashSet<GlobalSlot>>,
}

impl UsageTracker {
    pub fn new(num_lecturers: usize, num_rooms: usize) -> Self {
        Self {
            lecturer_used: vec![HashSet::new(); num_lecturers],
            room_used: vec![HashSet::new(); num_rooms],
        }
    }

    pub fn lecturer_free(&self, occupancy: &OccupancyIndex, lecturer_idx: usize, slot: GlobalSlot) -> bool {
        occupancy.is_lecturer_free(lecturer_idx, slot) && !self.lecturer_used[lecturer_idx].contains(&slot)
    }

    pub fn room_free(&self, occupancy: &OccupancyIndex, room_idx: usize, slot: GlobalSlot) -> bool {
        occupancy.is_room_free(room_idx, slot) && !self.room_used[room_idx].contains(&slot)
    }

    pub fn commit(
        &mut self,
        lecturer_idx: usize,
        lecturer_slots: &[GlobalSlot],
        room_slots: &[(usize, GlobalSlot)],
    ) {
        for &slot in lecturer_slots {
            self.lecturer_used[lecturer_idx].insert(slot);
        }
        for &(room_idx, slot) in room_slots {
            self.room_used[room_idx].insert(slot);
        }
    }

    pub fn release(
        &mut self,
        lecturer_idx: usize,
        lecturer_slots: &[GlobalSlot],
        room_slots: &[(usize, GlobalSlot)],
    ) {
        for slot in lecturer_slots {
            self.lecturer_used[lecturer_idx].remove(slot);
        }
        for (room_idx, slot) in room_slots {
            self.room_used[*room_idx].remove(slot);
        }
    }

    /// Recomputes both sets from scratch against a full assignment list.
    /// Used by the improvement pass instead of threading incremental
    /// commit/release through every candidate move.
    pub fn rebuild(&mut self, assignments: &[GroupAssignment], groups: &[GroupSpec], calendar: &CalendarIndex) {
        for set in &mut self.lecturer_used {
            set.clear();
        }
        for set in &mut self.room_used {
            set.clear();
        }
        for assignment in assignments {
            let group = &groups[assignment.group_idx];
            if let Some((lecturer_slots, room_slots)) = enumerate_slots(group, assignment, calendar) {
                self.commit(assignment.lecturer_idx, &lecturer_slots, &room_slots);
            }
        }
    }
}
