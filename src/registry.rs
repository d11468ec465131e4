// ============================================================================
// Resource Registry
// ============================================================================
// Deterministic dense indexing of lecturers, rooms, time-slots, and day
// names. Domain IDs are remapped here once, at request entry, so the rest
// of the engine never hashes a string again.
// ============================================================================

use std::collections::HashMap;

use tracing::info;

use crate::error::{Result, ScheduleError};
use crate::model::{Lecturer, Room, TimeSlot};

#[derive(Debug)]
pub struct ResourceRegistry {
    lecturer_id_to_idx: HashMap<String, usize>,
    lecturer_idx_to_id: Vec<String>,
    room_id_to_idx: HashMap<String, usize>,
    room_idx_to_id: Vec<String>,
    time_slot_id_to_idx: HashMap<String, usize>,
    time_slot_idx_to_id: Vec<String>,
    pub capacities_by_room_index: Vec<u32>,
}

impl ResourceRegistry {
    pub fn build(lecturers: &[Lecturer], rooms: &[Room], time_slots: &[TimeSlot]) -> Result<Self> {
        if lecturers.is_empty() {
            return Err(ScheduleError::EmptyResource("lecturers"));
        }
        if rooms.is_empty() {
            return Err(ScheduleError::EmptyResource("rooms"));
        }
        if time_slots.is_empty() {
            return Err(ScheduleError::EmptyResource("timeSlots"));
        }

        let lecturer_idx_to_id: Vec<String> = lecturers.iter().map(|l| l.id.clone()).collect();
        let lecturer_id_to_idx = lecturer_idx_to_id
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let room_idx_to_id: Vec<String> = rooms.iter().map(|r| r.id.clone()).collect();
        let room_id_to_idx = room_idx_to_id
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let capacities_by_room_index = rooms.iter().map(|r| r.capacity).collect();

        let time_slot_idx_to_id: Vec<String> = time_slots.iter().map(|t| t.id.clone()).collect();
        let time_slot_id_to_idx = time_slot_idx_to_id
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        info!(
            lecturers = lecturer_idx_to_id.len(),
            rooms = room_idx_to_id.len(),
            time_slots = time_slot_idx_to_id.len(),
            "resource registry built"
        );

        Ok(Self {
            lecturer_id_to_idx,
            lecturer_idx_to_id,
            room_id_to_idx,
            room_idx_to_id,
            time_slot_id_to_idx,
            time_slot_idx_to_id,
            capacities_by_room_index,
        })
    }

    pub fn num_lecturers(&self) -> usize {
        self.lecturer_idx_to_id.len()
    }

    pub fn num_rooms(&self) -> usize {
        self.room_idx_to_id.len()
    }

    pub fn num_time_slots(&self) -> usize {
        self.time_slot_idx_to_id.len()
    }

    pub fn lecturer_idx(&self, id: &str) -> Option<usize> {
        self.lecturer_id_to_idx.get(id).copied()
    }

    pub fn room_idx(&self, id: &str) -> Option<usize> {
        self.room_id_to_idx.get(id).copied()
    }

    pub fn time_slot_idx(&self, id: &str) -> Option<usize> {
        self.time_slot_id_to_idx.get(id).copied()
    }

    pub fn lecturer_id(&self, idx: usize) -> &str {
        &self.lecturer_idx_to_id[idx]
    }

    pub fn room_id(&self, idx: usize) -> &str {
        &self.room_idx_to_id[idx]
    }

    pub fn time_slot_id(&self, idx: usize) -> &str {
        &self.time_slot_idx_to_id[idx]
    }
}
