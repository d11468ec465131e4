// ============================================================================
// Result Decoder
// ============================================================================
// Walks a solved assignment and reconstructs the response DTOs: per-group
// schedule details with concrete dates, per-course aggregates, and
// per-lecturer load and spread. Output ordering is a contract: courses in
// input order, groups by groupNumber, weekly details by (dayIdx, shiftIdx),
// dates ascending.
// ============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::CalendarIndex;
use crate::model::internal::{GroupSpec, SessionSpec};
use crate::model::response::{
    LecturerLoadEntry, ScheduledClassGroup, ScheduledCourse, WeeklyScheduleDetail,
};
use crate::preprocess::PreprocessedCourse;
use crate::registry::ResourceRegistry;
use crate::solver::GroupAssignment;

pub fn decode(
    courses: &[PreprocessedCourse],
    groups: &[GroupSpec],
    sessions: &[SessionSpec],
    assignments: &[GroupAssignment],
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
) -> (Vec<ScheduledCourse>, Vec<LecturerLoadEntry>, u32) {
    let assignment_by_group: BTreeMap<usize, &GroupAssignment> =
        assignments.iter().map(|a| (a.group_idx, a)).collect();

    let mut sessions_by_group: BTreeMap<usize, Vec<&SessionSpec>> = BTreeMap::new();
    for session in sessions {
        sessions_by_group.entry(session.group_idx).or_default().push(session);
    }

    let mut lecturer_sessions = vec![0u32; registry.num_lecturers()];

    let scheduled_courses = courses
        .iter()
        .map(|course| {
            let mut class_groups: Vec<ScheduledClassGroup> = course
                .group_indices
                .iter()
                .filter_map(|&group_idx| {
                    let assignment = assignment_by_group.get(&group_idx)?;
                    let group = &groups[group_idx];
                    let group_sessions = sessions_by_group.get(&group_idx).cloned().unwrap_or_default();
                    lecturer_sessions[assignment.lecturer_idx] += group_sessions.len() as u32;
                    Some(decode_group(group, assignment, &group_sessions, calendar, registry))
                })
                .collect();
            class_groups.sort_by_key(|g| g.group_number);

            ScheduledCourse {
                course_id: course.course_id.clone(),
                total_registered_students: course.total_registered_students,
                total_sessions_for_course: course.total_sessions,
                scheduled_class_groups: class_groups,
            }
        })
        .collect();

    let lecturer_load: Vec<LecturerLoadEntry> = (0..registry.num_lecturers())
        .map(|idx| LecturerLoadEntry {
            lecturer_id: registry.lecturer_id(idx).to_string(),
            sessions_assigned: lecturer_sessions[idx],
        })
        .collect();

    let load_difference = lecturer_sessions
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .saturating_sub(lecturer_sessions.iter().copied().min().unwrap_or(0));

    (scheduled_courses, lecturer_load, load_difference)
}

fn decode_group(
    group: &GroupSpec,
    assignment: &GroupAssignment,
    sessions: &[&SessionSpec],
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
) -> ScheduledClassGroup {
    let mut dates_by_weekly: BTreeMap<usize, Vec<NaiveDate>> = BTreeMap::new();
    let mut all_dates: Vec<NaiveDate> = Vec::with_capacity(sessions.len());

    for session in sessions {
        let slot = assignment.session_slot(calendar, session);
        let date = calendar.date_of(slot);
        dates_by_weekly
            .entry(session.intra_week_index as usize)
            .or_default()
            .push(date);
        all_dates.push(date);
    }
    all_dates.sort_unstable();

    let mut weekly_order: Vec<usize> = (0..assignment.weekly.len()).collect();
    weekly_order.sort_by_key(|&i| {
        let weekly = &assignment.weekly[i];
        (weekly.day_idx, weekly.shift_idx)
    });

    let weekly_schedule_details: Vec<WeeklyScheduleDetail> = weekly_order
        .into_iter()
        .map(|i| {
            let weekly = &assignment.weekly[i];
            let mut dates = dates_by_weekly.remove(&i).unwrap_or_default();
            dates.sort_unstable();
            let day_of_week = calendar
                .day_name(weekly.day_idx)
                .expect("weekly day index is always one of the calendar's active days");
            WeeklyScheduleDetail {
                day_of_week,
                time_slot_id: registry.time_slot_id(weekly.shift_idx as usize).to_string(),
                room_id: registry.room_id(weekly.room_idx).to_string(),
                scheduled_dates: dates,
            }
        })
        .collect();

    let max_students = assignment
        .weekly
        .iter()
        .map(|w| registry.capacities_by_room_index[w.room_idx])
        .min()
        .unwrap_or(0);

    ScheduledClassGroup {
        group_number: group.group_number,
        max_students,
        lecturer_id: registry.lecturer_id(assignment.lecturer_idx).to_string(),
        group_start_date: *all_dates.first().expect("a placed group always has at least one session"),
        group_end_date: *all_dates.last().expect("a placed group always has at least one session"),
        total_teaching_weeks_for_group: group.course_weeks,
        sessions_per_week_for_group: group.sessions_per_week,
        weekly_schedule_details,
    }
}
