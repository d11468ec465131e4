// ============================================================================
// Internal model — owned by a single scheduling request
// ============================================================================
// Everything here is built fresh per `schedule()` call and dropped when it
// returns. Domain IDs (course/lecturer/room/slot ids) only appear at the
// request/response boundary; internally everything is a dense index.
// ============================================================================

/// The dense index of an active (week, day, shift) triple. Stable for the
/// lifetime of one scheduling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalSlot(pub u32);

/// A course split into one class group, sized and counted by the course
/// preprocessor. Carries everything the constraint model builder needs to
/// create `start_week[g]`, `lecturer[g]`, and the k `(day, shift, room)`
/// variables for one group.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub course_idx: usize,
    pub course_id: String,
    pub group_number: u32,
    pub student_count: u32,
    /// k: sessions per week this group meets.
    pub sessions_per_week: u32,
    /// W: consecutive calendar weeks the course spans.
    pub course_weeks: u32,
    /// T: total sessions across the whole run.
    pub total_sessions: u32,
    /// Dense lecturer indices eligible to teach this group's course.
    pub eligible_lecturers: Vec<usize>,
}

/// One class meeting, owned by its group.
#[derive(Debug, Clone, Copy)]
pub struct SessionSpec {
    pub group_idx: usize,
    /// 0-based position within the group's weekly pattern, in [0, k).
    pub intra_week_index: u32,
    /// 0-based position within the course's run, in [0, W).
    pub course_week_index: u32,
    /// 1-based position across all of this group's sessions.
    pub overall_sequence: u32,
}
