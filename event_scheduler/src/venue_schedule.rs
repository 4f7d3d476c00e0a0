use crate::{
    error::BookingError,
    types::{Event, Slot, TimeOfDay},
};

/// Events of one venue on one date, sorted by start, pairwise non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueSchedule {
    events: Vec<Event>,
}

impl VenueSchedule {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Earliest-starting event that overlaps `slot`, if any.
    pub fn first_conflict(&self, slot: &Slot) -> Option<&Event> {
        // Everything from `right_bound` on starts at or after `slot.end`.
        let right_bound = self.events.partition_point(|e| e.start() < slot.end);
        self.events[..right_bound]
            .iter()
            .find(|e| e.slot().overlaps(slot))
    }

    /// Inserts `event` at its sorted position unless it overlaps a booked one.
    /// Leaves the schedule untouched on conflict.
    pub fn try_insert(&mut self, event: Event) -> Result<(), BookingError> {
        if let Some(conflicting) = self.first_conflict(&event.slot()) {
            return Err(BookingError::Conflict {
                conflicting: conflicting.clone(),
            });
        }

        let pos = self.events.partition_point(|e| e.start() < event.start());
        self.events.insert(pos, event);
        Ok(())
    }

    /// Removes the event starting at `start`. Starts are unique per venue.
    pub fn remove(&mut self, start: TimeOfDay) -> Option<Event> {
        let pos = self
            .events
            .binary_search_by_key(&start, |e| e.start())
            .ok()?;
        Some(self.events.remove(pos))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Up to `limit` free slots of `duration` minutes, one per gap, each at
    /// the beginning of its gap. The bookable day is `[00:00, 23:59)`.
    pub fn free_slots(&self, duration: u16, limit: usize) -> Vec<Slot> {
        let mut slots = Vec::new();
        if duration == 0 {
            return slots;
        }

        let gap_ends = self
            .events
            .iter()
            .map(|e| (e.start(), e.end()))
            .chain(std::iter::once((TimeOfDay::LAST_MINUTE, TimeOfDay::LAST_MINUTE)));

        let mut cursor = TimeOfDay::MIDNIGHT;
        for (gap_end, next_cursor) in gap_ends {
            if slots.len() >= limit {
                break;
            }
            if gap_end.minutes().saturating_sub(cursor.minutes()) >= duration {
                let end = TimeOfDay::from_minutes(cursor.minutes() + duration);
                if let Some(end) = end {
                    slots.push(Slot { start: cursor, end });
                }
            }
            cursor = cursor.max(next_cursor);
        }
        slots
    }
}
