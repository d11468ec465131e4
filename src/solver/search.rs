// ============================================================================
// Backtracking search
// ============================================================================
// Places groups one at a time, hardest-to-place first, generating candidate
// (lecturer, start_week, weekly day/shift/room) placements in deterministic
// order and backtracking chronologically on failure — the same shape as a
// hand-rolled CSP solver's recursive placement loop, just over this engine's
// own decision variables.
// ============================================================================

use std::time::Instant;

use tracing::{debug, info};

use crate::calendar::CalendarIndex;
use crate::model::internal::GroupSpec;
use crate::occupancy::OccupancyIndex;
use crate::registry::ResourceRegistry;

use super::model::{enumerate_slots, GroupAssignment, UsageTracker, WeeklySlot};

/// Caps the candidates generated for a single group at a single search
/// depth. Keeps worst-case search time bounded without needing the full
/// enumeration to be scored; legitimate schedules are found well under this.
const CANDIDATE_CAP: usize = 512;

pub enum SearchOutcome {
    Solved(Vec<GroupAssignment>),
    Infeasible,
    TimedOut,
}

pub struct SearchState<'a> {
    groups: &'a [GroupSpec],
    calendar: &'a CalendarIndex,
    registry: &'a ResourceRegistry,
    occupancy: &'a OccupancyIndex,
    deadline: Instant,
    order: Vec<usize>,
}

impl<'a> SearchState<'a> {
    pub fn new(
        groups: &'a [GroupSpec],
        calendar: &'a CalendarIndex,
        registry: &'a ResourceRegistry,
        occupancy: &'a OccupancyIndex,
        deadline: Instant,
    ) -> Self {
        let mut order: Vec<usize> = (0..groups.len()).collect();
        order.sort_by_key(|&i| {
            let g = &groups[i];
            (g.eligible_lecturers.len(), std::cmp::Reverse(g.student_count))
        });
        Self {
            groups,
            calendar,
            registry,
            occupancy,
            deadline,
            order,
        }
    }

    pub fn run(&self) -> SearchOutcome {
        let mut tracker = UsageTracker::new(self.registry.num_lecturers(), self.registry.num_rooms());
        let mut assignments: Vec<Option<GroupAssignment>> = vec![None; self.groups.len()];
        info!(groups = self.groups.len(), "starting backtracking search");
        match self.backtrack(0, &mut tracker, &mut assignments) {
            Some(true) => SearchOutcome::Solved(assignments.into_iter().map(|a| a.unwrap()).collect()),
            Some(false) => SearchOutcome::Infeasible,
            None => SearchOutcome::TimedOut,
        }
    }

    fn backtrack(
        &self,
        pos: usize,
        tracker: &mut UsageTracker,
        assignments: &mut [Option<GroupAssignment>],
    ) -> Option<bool> {
        if pos == self.order.len() {
            return Some(true);
        }
        if Instant::now() >= self.deadline {
            return None;
        }

        let group_idx = self.order[pos];
        let group = &self.groups[group_idx];
        for candidate in self.candidates(group_idx, tracker) {
            if Instant::now() >= self.deadline {
                return None;
            }
            let Some((lecturer_slots, room_slots)) = enumerate_slots(group, &candidate, self.calendar) else {
                continue;
            };
            tracker.commit(candidate.lecturer_idx, &lecturer_slots, &room_slots);
            assignments[group_idx] = Some(candidate);

            match self.backtrack(pos + 1, tracker, assignments) {
                Some(true) => return Some(true),
                Some(false) => {
                    let placed = assignments[group_idx].take().unwrap();
                    tracker.release(placed.lecturer_idx, &lecturer_slots, &room_slots);
                }
                None => return None,
            }
        }
        debug!(
            course = %group.course_id,
            group = group.group_number,
            "no candidate placement satisfies hard constraints at this search depth"
        );
        Some(false)
    }

    /// Deterministic, first-fit candidate generator: lecturer ascending,
    /// start week ascending, weekly day/shift pattern ascending by slot id,
    /// each weekly meeting assigned the smallest-index room that fits and is
    /// free for every course week. First-fit keeps the space tractable and
    /// already biases toward early, well-packed placements.
    fn candidates(&self, group_idx: usize, tracker: &UsageTracker) -> Vec<GroupAssignment> {
        let group = &self.groups[group_idx];
        let mut out = Vec::new();
        let max_start_week = self.calendar.total_weeks.saturating_sub(group.course_weeks);
        let pairs = weekly_slot_pairs(self.calendar.num_days, self.calendar.num_shifts);

        let mut lecturers = group.eligible_lecturers.clone();
        lecturers.sort_unstable();

        'search: for &lecturer_idx in &lecturers {
            for start_week in 0..=max_start_week {
                for combo in combinations(&pairs, group.sessions_per_week as usize) {
                    let Some(weekly) = self.fit_rooms(group, start_week, &combo, tracker) else {
                        continue;
                    };
                    if !self.lecturer_available(group, lecturer_idx, start_week, &weekly, tracker) {
                        continue;
                    }
                    out.push(GroupAssignment {
                        group_idx,
                        lecturer_idx,
                        start_week,
                        weekly,
                    });
                    if out.len() >= CANDIDATE_CAP {
                        break 'search;
                    }
                }
            }
        }
        out
    }

    fn fit_rooms(
        &self,
        group: &GroupSpec,
        start_week: u32,
        combo: &[(u32, u32)],
        tracker: &UsageTracker,
    ) -> Option<Vec<WeeklySlot>> {
        let mut weekly = Vec::with_capacity(combo.len());
        for &(day_idx, shift_idx) in combo {
            let room_idx = (0..self.registry.num_rooms()).find(|&room_idx| {
                self.registry.capacities_by_room_index[room_idx] >= group.student_count
                    && (0..group.course_weeks).all(|w| {
                        match self.calendar.slot(start_week + w, day_idx, shift_idx) {
                            Some(slot) => tracker.room_free(self.occupancy, room_idx, slot),
                            None => false,
                        }
                    })
            })?;
            weekly.push(WeeklySlot {
                day_idx,
                shift_idx,
                room_idx,
            });
        }
        Some(weekly)
    }

    fn lecturer_available(
        &self,
        group: &GroupSpec,
        lecturer_idx: usize,
        start_week: u32,
        weekly: &[WeeklySlot],
        tracker: &UsageTracker,
    ) -> bool {
        (0..group.course_weeks).all(|w| {
            weekly.iter().all(
                |slot| match self.calendar.slot(start_week + w, slot.day_idx, slot.shift_idx) {
                    Some(g) => tracker.lecturer_free(self.occupancy, lecturer_idx, g),
                    None => false,
                },
            )
        })
    }
}

fn weekly_slot_pairs(num_days: u32, num_shifts: u32) -> Vec<(u32, u32)> {
    let mut pairs = Vec::with_capacity((num_days * num_shifts) as usize);
    for day in 0..num_days {
        for shift in 0..num_shifts {
            pairs.push((day, shift));
        }
    }
    pairs
}

fn combinations(items: &[(u32, u32)], k: usize) -> Vec<Vec<(u32, u32)>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    combine(items, k, 0, &mut current, &mut out);
    out
}

fn combine(
    items: &[(u32, u32)],
    k: usize,
    start: usize,
    current: &mut Vec<(u32, u32)>,
    out: &mut Vec<Vec<(u32, u32)>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in start..items.len() {
        current.push(items[i]);
        combine(items, k, i + 1, current, out);
        current.pop();
    }
}
