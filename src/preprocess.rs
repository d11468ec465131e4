// ============================================================================
// Course Preprocessor
// ============================================================================
// Chooses sessions-per-week and the total course-weeks span, splits each
// course into class groups sized by `groupSizeTarget`, and emits the ordered
// session list for every group. The solver decides which of a group's W
// consecutive calendar weeks each session lands on — this module only
// fixes the sequence, not the placement.
// ============================================================================

use tracing::{debug, info, warn};

use crate::error::{Result, ScheduleError};
use crate::model::request::Course;
use crate::model::internal::{GroupSpec, SessionSpec};
use crate::registry::ResourceRegistry;

#[derive(Debug)]
pub struct PreprocessedCourse {
    pub course_id: String,
    pub total_registered_students: u32,
    pub total_sessions: u32,
    /// Indices into the flat `groups` vector returned alongside this course.
    pub group_indices: Vec<usize>,
}

#[derive(Debug)]
pub struct PreprocessResult {
    pub courses: Vec<PreprocessedCourse>,
    pub groups: Vec<GroupSpec>,
    pub sessions: Vec<SessionSpec>,
}

/// Smallest k in `[1, max_k]` with `ceil(total_sessions / k) <= available_weeks`.
fn sessions_per_week(total_sessions: u32, available_weeks: u32, max_k: u32) -> Option<u32> {
    let mut k = 1;
    while k < max_k && div_ceil(total_sessions, k) > available_weeks {
        k += 1;
    }
    if div_ceil(total_sessions, k) > available_weeks {
        None
    } else {
        Some(k)
    }
}

fn div_ceil(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

pub fn preprocess_courses(
    courses: &[Course],
    registry: &ResourceRegistry,
    available_weeks: u32,
    group_size_target: u32,
    max_sessions_per_week_allowed: u32,
) -> Result<PreprocessResult> {
    let mut out_courses = Vec::with_capacity(courses.len());
    let mut groups = Vec::new();
    let mut sessions = Vec::new();

    for (course_idx, course) in courses.iter().enumerate() {
        if course.registered_students == 0 || course.total_semester_sessions == 0 {
            debug!(course = %course.id, "dropping course with zero students or zero sessions");
            out_courses.push(PreprocessedCourse {
                course_id: course.id.clone(),
                total_registered_students: 0,
                total_sessions: 0,
                group_indices: Vec::new(),
            });
            continue;
        }

        let eligible_lecturers: Vec<usize> = course
            .potential_lecturer_ids
            .iter()
            .filter_map(|id| registry.lecturer_idx(id))
            .collect();
        if eligible_lecturers.is_empty() {
            return Err(ScheduleError::NoEligibleLecturer {
                course_id: course.id.clone(),
            });
        }

        let k = sessions_per_week(
            course.total_semester_sessions,
            available_weeks,
            max_sessions_per_week_allowed,
        )
        .ok_or_else(|| ScheduleError::CourseDoesNotFit {
            course_id: course.id.clone(),
            total_sessions: course.total_semester_sessions,
            available_weeks,
            max_sessions_per_week: max_sessions_per_week_allowed,
        })?;
        let course_weeks = div_ceil(course.total_semester_sessions, k);

        let group_count = {
            let m = div_ceil(course.registered_students, group_size_target.max(1));
            if m == 0 {
                1
            } else {
                m
            }
        };
        let base = course.registered_students / group_count;
        let remainder = course.registered_students % group_count;

        info!(
            course = %course.id,
            sessions_per_week = k,
            course_weeks,
            group_count,
            "course preprocessed"
        );

        let mut group_indices = Vec::new();
        for g in 0..group_count {
            let student_count = base + u32::from(g < remainder);
            if student_count == 0 {
                warn!(course = %course.id, group = g + 1, "dropping zero-sized group");
                continue;
            }

            let group_idx = groups.len();
            groups.push(GroupSpec {
                course_idx,
                course_id: course.id.clone(),
                group_number: g + 1,
                student_count,
                sessions_per_week: k,
                course_weeks,
                total_sessions: course.total_semester_sessions,
                eligible_lecturers: eligible_lecturers.clone(),
            });
            group_indices.push(group_idx);

            for seq in 1..=course.total_semester_sessions {
                let zero_based = seq - 1;
                sessions.push(SessionSpec {
                    group_idx,
                    intra_week_index: zero_based % k,
                    course_week_index: zero_based / k,
                    overall_sequence: seq,
                });
            }
        }

        out_courses.push(PreprocessedCourse {
            course_id: course.id.clone(),
            total_registered_students: course.registered_students,
            total_sessions: course.total_semester_sessions,
            group_indices,
        });
    }

    Ok(PreprocessResult {
        courses: out_courses,
        groups,
        sessions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::request::{Lecturer, Room, TimeSlot};

    fn registry() -> ResourceRegistry {
        ResourceRegistry::build(
            &[
                Lecturer { id: "L1".into() },
                Lecturer { id: "L2".into() },
            ],
            &[Room {
                id: "R1".into(),
                label: "R1".into(),
                capacity: 40,
                room_type: None,
            }],
            &[TimeSlot {
                id: "T1".into(),
                shift: 1,
            }],
        )
        .unwrap()
    }

    #[test]
    fn splits_into_even_groups() {
        let reg = registry();
        let course = Course {
            id: "C1".into(),
            credits: 3,
            total_semester_sessions: 15,
            registered_students: 150,
            potential_lecturer_ids: vec!["L1".into()],
        };
        let result = preprocess_courses(&[course], &reg, 15, 60, 3).unwrap();
        assert_eq!(result.groups.len(), 3);
        assert!(result.groups.iter().all(|g| g.student_count == 50));
        assert_eq!(result.sessions.len(), 45);
    }

    #[test]
    fn drops_zero_student_course() {
        let reg = registry();
        let course = Course {
            id: "C1".into(),
            credits: 3,
            total_semester_sessions: 10,
            registered_students: 0,
            potential_lecturer_ids: vec!["L1".into()],
        };
        let result = preprocess_courses(&[course], &reg, 15, 60, 3).unwrap();
        assert!(result.groups.is_empty());
        assert_eq!(result.courses[0].total_sessions, 0);
    }

    #[test]
    fn errors_when_course_cannot_fit() {
        let reg = registry();
        let course = Course {
            id: "C1".into(),
            credits: 3,
            total_semester_sessions: 20,
            registered_students: 10,
            potential_lecturer_ids: vec!["L1".into()],
        };
        let err = preprocess_courses(&[course], &reg, 5, 60, 2).unwrap_err();
        assert!(matches!(err, ScheduleError::CourseDoesNotFit { .. }));
    }

    #[test]
    fn errors_when_no_eligible_lecturer_known() {
        let reg = registry();
        let course = Course {
            id: "C1".into(),
            credits: 3,
            total_semester_sessions: 5,
            registered_students: 10,
            potential_lecturer_ids: vec!["UNKNOWN".into()],
        };
        let err = preprocess_courses(&[course], &reg, 10, 60, 3).unwrap_err();
        assert!(matches!(err, ScheduleError::NoEligibleLecturer { .. }));
    }
}
