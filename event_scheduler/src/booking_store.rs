use crate::{
    backend::ScheduleBackend,
    error::BookingError,
    types::{DaySchedule, Event, Slot, TimeOfDay},
    venue_schedule::VenueSchedule,
};
use chrono::NaiveDate;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

type Days = HashMap<NaiveDate, HashMap<String, VenueSchedule>>;

const EXAMPLE_EVENTS: [(&str, &str, TimeOfDay, TimeOfDay); 3] = [
    ("Hall A", "Opening Talk", TimeOfDay::at(9, 0), TimeOfDay::at(10, 0)),
    ("Hall A", "Panel Discussion", TimeOfDay::at(10, 0), TimeOfDay::at(11, 0)),
    ("Hall B", "Rust Workshop", TimeOfDay::at(9, 0), TimeOfDay::at(12, 0)),
];

/// In-memory bookings indexed by date, then venue.
///
/// Cloning yields another handle onto the same store. A single lock guards
/// the whole index: `book` holds it exclusively for its scan-then-insert, so
/// two overlapping requests for the same venue and date can never both win.
#[derive(Debug, Clone, Default)]
pub struct BookingStore {
    days: Arc<RwLock<Days>>,
}

impl BookingStore {
    // Mutation only happens after the conflict scan passed, so a poisoned
    // lock still guards a consistent index.
    fn read(&self) -> RwLockReadGuard<'_, Days> {
        self.days.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Days> {
        self.days.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the date and venue entries on first access.
    fn venue_schedule_mut<'a>(
        days: &'a mut Days,
        date: NaiveDate,
        venue: &str,
    ) -> &'a mut VenueSchedule {
        days.entry(date)
            .or_default()
            .entry(venue.to_owned())
            .or_default()
    }

    pub fn insert_example_events(&self, date: NaiveDate) -> Result<(), BookingError> {
        for (venue, title, start, end) in EXAMPLE_EVENTS {
            self.book(date, venue, title, start, end)?;
        }
        Ok(())
    }
}

impl ScheduleBackend for BookingStore {
    fn book(
        &self,
        date: NaiveDate,
        venue: &str,
        title: &str,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<(), BookingError> {
        let event = Event::new(title, start, end)?;
        let mut days = self.write();
        Self::venue_schedule_mut(&mut days, date, venue).try_insert(event)
    }

    fn cancel(&self, date: NaiveDate, venue: &str, start: TimeOfDay) -> Option<Event> {
        let mut days = self.write();
        let venues = days.get_mut(&date)?;
        let schedule = venues.get_mut(venue)?;
        let cancelled = schedule.remove(start)?;

        // Drop emptied containers so queries never report empty venues.
        if schedule.is_empty() {
            venues.remove(venue);
            if venues.is_empty() {
                days.remove(&date);
            }
        }
        Some(cancelled)
    }

    fn schedule(&self, date: NaiveDate) -> DaySchedule {
        self.read()
            .get(&date)
            .map(|venues| {
                venues
                    .iter()
                    .map(|(venue, schedule)| (venue.clone(), schedule.events().to_vec()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn free_slots(&self, date: NaiveDate, venue: &str, duration: u16, limit: usize) -> Vec<Slot> {
        let days = self.read();
        match days.get(&date).and_then(|venues| venues.get(venue)) {
            Some(schedule) => schedule.free_slots(duration, limit),
            None => VenueSchedule::default().free_slots(duration, limit),
        }
    }
}
