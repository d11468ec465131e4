// ============================================================================
// Occupancy Compiler
// ============================================================================
// Expands existing-schedule weekly recurrences and one-off occupied-slot
// records into two forbidden-pair sets, one per room and one per lecturer.
// Unresolvable entries (unknown ids, dates outside the semester, holidays)
// are silently skipped with a warning — holiday always wins over an
// occupancy record.
// ============================================================================

use std::collections::HashSet;

use tracing::warn;

use crate::calendar::CalendarIndex;
use crate::model::internal::GlobalSlot;
use crate::model::request::{ExistingScheduleRecord, OccupiedResourceSlot, ResourceKind};
use crate::registry::ResourceRegistry;

#[derive(Debug, Default)]
pub struct OccupancyIndex {
    pub room_occupied: Vec<HashSet<GlobalSlot>>,
    pub lecturer_occupied: Vec<HashSet<GlobalSlot>>,
}

impl OccupancyIndex {
    pub fn is_room_free(&self, room_idx: usize, slot: GlobalSlot) -> bool {
        !self.room_occupied[room_idx].contains(&slot)
    }

    pub fn is_lecturer_free(&self, lecturer_idx: usize, slot: GlobalSlot) -> bool {
        !self.lecturer_occupied[lecturer_idx].contains(&slot)
    }
}

pub fn compile_occupancy(
    calendar: &CalendarIndex,
    registry: &ResourceRegistry,
    existing_schedules: &[ExistingScheduleRecord],
    occupied_slots: &[OccupiedResourceSlot],
) -> OccupancyIndex {
    let mut index = OccupancyIndex {
        room_occupied: vec![HashSet::new(); registry.num_rooms()],
        lecturer_occupied: vec![HashSet::new(); registry.num_lecturers()],
    };

    for record in existing_schedules {
        let (room_idx, lecturer_idx, shift_idx) = match (
            registry.room_idx(&record.room_id),
            registry.lecturer_idx(&record.lecturer_id),
            registry.time_slot_idx(&record.time_slot_id),
        ) {
            (Some(r), Some(l), Some(s)) => (r, l, s),
            _ => {
                warn!(
                    room = %record.room_id,
                    lecturer = %record.lecturer_id,
                    time_slot = %record.time_slot_id,
                    "existing-schedule record names an unknown resource, skipping"
                );
                continue;
            }
        };
        let Some(day_idx) = calendar.day_index(record.day_of_week) else {
            warn!(day = ?record.day_of_week, "existing-schedule record's day is not active, skipping");
            continue;
        };

        for week_idx in 0..calendar.total_weeks {
            let Some(date) = calendar.week_day_to_date(week_idx, day_idx) else {
                continue;
            };
            if date < record.start_date || date > record.end_date {
                continue;
            }
            if let Some(slot) = calendar.slot(week_idx, day_idx, shift_idx as u32) {
                index.room_occupied[room_idx].insert(slot);
                index.lecturer_occupied[lecturer_idx].insert(slot);
            }
        }
    }

    for occupied in occupied_slots {
        let Some(shift_idx) = registry.time_slot_idx(&occupied.time_slot_id) else {
            warn!(time_slot = %occupied.time_slot_id, "occupied-slot record names an unknown time slot, skipping");
            continue;
        };
        let Some((week_idx, day_idx)) = calendar.date_to_week_day(occupied.date) else {
            warn!(date = %occupied.date, "occupied-slot record falls on a holiday or outside the semester, skipping");
            continue;
        };
        let Some(slot) = calendar.slot(week_idx, day_idx, shift_idx as u32) else {
            continue;
        };

        match occupied.kind {
            ResourceKind::Room => match registry.room_idx(&occupied.resource_id) {
                Some(idx) => {
                    index.room_occupied[idx].insert(slot);
                }
                None => warn!(room = %occupied.resource_id, "occupied-slot record names an unknown room, skipping"),
            },
            ResourceKind::Lecturer => match registry.lecturer_idx(&occupied.resource_id) {
                Some(idx) => {
                    index.lecturer_occupied[idx].insert(slot);
                }
                None => warn!(lecturer = %occupied.resource_id, "occupied-slot record names an unknown lecturer, skipping"),
            },
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::request::{DayName, Lecturer, Room, TimeSlot};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup() -> (CalendarIndex, ResourceRegistry) {
        let calendar = CalendarIndex::build(
            d("2024-09-02"),
            d("2024-09-15"),
            &[DayName::Monday, DayName::Tuesday],
            2,
            &Default::default(),
        )
        .unwrap();
        let registry = ResourceRegistry::build(
            &[Lecturer { id: "L1".into() }],
            &[Room {
                id: "R1".into(),
                label: "R1".into(),
                capacity: 40,
                room_type: None,
            }],
            &[
                TimeSlot {
                    id: "T1".into(),
                    shift: 1,
                },
                TimeSlot {
                    id: "T2".into(),
                    shift: 2,
                },
            ],
        )
        .unwrap();
        (calendar, registry)
    }

    #[test]
    fn existing_schedule_occupies_every_matching_monday() {
        let (calendar, registry) = setup();
        let records = vec![ExistingScheduleRecord {
            room_id: "R1".into(),
            lecturer_id: "L1".into(),
            time_slot_id: "T1".into(),
            day_of_week: DayName::Monday,
            start_date: d("2024-09-02"),
            end_date: d("2024-09-15"),
        }];
        let occupancy = compile_occupancy(&calendar, &registry, &records, &[]);
        assert_eq!(occupancy.room_occupied[0].len(), 2);
        assert_eq!(occupancy.lecturer_occupied[0].len(), 2);
    }

    #[test]
    fn occupied_slot_on_holiday_is_skipped() {
        let (calendar, registry) = setup();
        let occupied = vec![OccupiedResourceSlot {
            kind: ResourceKind::Room,
            resource_id: "R1".into(),
            date: d("2024-09-07"),
            time_slot_id: "T1".into(),
        }];
        let occupancy = compile_occupancy(&calendar, &registry, &[], &occupied);
        assert!(occupancy.room_occupied[0].is_empty());
    }

    #[test]
    fn unknown_resource_is_skipped_without_panic() {
        let (calendar, registry) = setup();
        let records = vec![ExistingScheduleRecord {
            room_id: "GHOST".into(),
            lecturer_id: "L1".into(),
            time_slot_id: "T1".into(),
            day_of_week: DayName::Monday,
            start_date: d("2024-09-02"),
            end_date: d("2024-09-15"),
        }];
        let occupancy = compile_occupancy(&calendar, &registry, &records, &[]);
        assert!(occupancy.lecturer_occupied[0].is_empty());
    }
}
