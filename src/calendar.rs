// ============================================================================
// Calendar Indexer
// ============================================================================
// Produces the global-slot bijection: every (week, day, shift) triple whose
// date survives the holiday/day-of-week filter gets one dense integer,
// assigned in lexicographic (week, day, shift) order.
// ============================================================================

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::model::{DayName, GlobalSlot};

#[derive(Debug)]
pub struct CalendarIndex {
    slot_to_details: Vec<(u32, u32, u32)>,
    details_to_slot: HashMap<(u32, u32, u32), GlobalSlot>,
    week_day_to_date: HashMap<(u32, u32), NaiveDate>,
    date_to_week_day: HashMap<NaiveDate, (u32, u32)>,
    day_index: HashMap<DayName, u32>,
    allowed_days: Vec<DayName>,
    pub total_weeks: u32,
    pub num_days: u32,
    pub num_shifts: u32,
}

impl CalendarIndex {
    /// Builds the bijection over `[start, end]`, keeping only dates that
    /// fall on one of `allowed_days` and are not in `holidays`.
    ///
    /// `allowed_days`' order defines the day index used throughout the
    /// model.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        allowed_days: &[DayName],
        num_shifts: u32,
        holidays: &std::collections::HashSet<NaiveDate>,
    ) -> Result<Self> {
        if end <= start {
            return Err(ScheduleError::InvalidDateRange);
        }
        if allowed_days.is_empty() {
            return Err(ScheduleError::EmptyResource("daysOfWeek"));
        }
        if num_shifts == 0 {
            return Err(ScheduleError::EmptyResource("timeSlots"));
        }

        let day_index: HashMap<DayName, u32> = allowed_days
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i as u32))
            .collect();

        let num_days_in_semester = (end - start).num_days() + 1;
        let total_weeks = ((num_days_in_semester + 6) / 7) as u32;

        let mut date_to_week_day = HashMap::new();
        let mut week_day_to_date = HashMap::new();
        let mut date = start;
        while date <= end {
            if !holidays.contains(&date) {
                if let Some(&day_idx) = day_index.get(&DayName::from_chrono(date)) {
                    let week_idx = ((date - start).num_days() / 7) as u32;
                    date_to_week_day.insert(date, (week_idx, day_idx));
                    week_day_to_date.insert((week_idx, day_idx), date);
                }
            }
            date += Duration::days(1);
        }

        let mut slot_to_details = Vec::new();
        let mut details_to_slot = HashMap::new();
        for week_idx in 0..total_weeks {
            for day_idx in 0..(allowed_days.len() as u32) {
                if !week_day_to_date.contains_key(&(week_idx, day_idx)) {
                    continue;
                }
                for shift_idx in 0..num_shifts {
                    let slot = GlobalSlot(slot_to_details.len() as u32);
                    slot_to_details.push((week_idx, day_idx, shift_idx));
                    details_to_slot.insert((week_idx, day_idx, shift_idx), slot);
                }
            }
        }

        if slot_to_details.is_empty() {
            return Err(ScheduleError::EmptyCalendar);
        }

        info!(
            total_weeks,
            num_days = allowed_days.len(),
            num_shifts,
            active_slots = slot_to_details.len(),
            "calendar index built"
        );
        debug!(active_dates = date_to_week_day.len(), "active calendar dates resolved");

        Ok(Self {
            slot_to_details,
            details_to_slot,
            week_day_to_date,
            date_to_week_day,
            day_index,
            allowed_days: allowed_days.to_vec(),
            total_weeks,
            num_days: allowed_days.len() as u32,
            num_shifts,
        })
    }

    /// The dense day index a `DayName` was assigned, if it is one of the
    /// calendar's active days of week.
    pub fn day_index(&self, day: DayName) -> Option<u32> {
        self.day_index.get(&day).copied()
    }

    /// The `DayName` assigned to a dense day index, the inverse of
    /// `day_index`.
    pub fn day_name(&self, day_idx: u32) -> Option<DayName> {
        self.allowed_days.get(day_idx as usize).copied()
    }

    pub fn num_active_slots(&self) -> usize {
        self.slot_to_details.len()
    }

    pub fn slot(&self, week_idx: u32, day_idx: u32, shift_idx: u32) -> Option<GlobalSlot> {
        self.details_to_slot
            .get(&(week_idx, day_idx, shift_idx))
            .copied()
    }

    pub fn details(&self, slot: GlobalSlot) -> (u32, u32, u32) {
        self.slot_to_details[slot.0 as usize]
    }

    pub fn week_day_to_date(&self, week_idx: u32, day_idx: u32) -> Option<NaiveDate> {
        self.week_day_to_date.get(&(week_idx, day_idx)).copied()
    }

    pub fn date_to_week_day(&self, date: NaiveDate) -> Option<(u32, u32)> {
        self.date_to_week_day.get(&date).copied()
    }

    pub fn date_of(&self, slot: GlobalSlot) -> NaiveDate {
        let (week_idx, day_idx, _) = self.details(slot);
        self.week_day_to_date(week_idx, day_idx)
            .expect("active slot always maps back to a calendar date")
    }
}
