use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::NaiveDate;

use crate::{
    backend::ScheduleBackend,
    error::BookingError,
    types::{DaySchedule, Event, Slot, TimeOfDay},
};

pub struct MockScheduleBackendInner {
    /// Returned by `book`; `None` means success.
    pub book_error: Mutex<Option<BookingError>>,
    pub calls_to_book: AtomicU64,
    pub calls_to_cancel: AtomicU64,
    pub calls_to_schedule: AtomicU64,
    pub calls_to_free_slots: AtomicU64,
    /// Returned by `cancel`.
    pub cancelled: Mutex<Option<Event>>,
    pub schedule: Mutex<DaySchedule>,
    pub free_slots: Mutex<Vec<Slot>>,
}

#[derive(Clone)]
pub struct MockScheduleBackend(pub Arc<MockScheduleBackendInner>);

impl MockScheduleBackendInner {
    fn new() -> Self {
        Self {
            book_error: Mutex::default(),
            calls_to_book: AtomicU64::default(),
            calls_to_cancel: AtomicU64::default(),
            calls_to_schedule: AtomicU64::default(),
            calls_to_free_slots: AtomicU64::default(),
            cancelled: Mutex::default(),
            schedule: Mutex::default(),
            free_slots: Mutex::default(),
        }
    }
}

impl MockScheduleBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockScheduleBackendInner::new()))
    }

    pub fn fail_with(&self, error: BookingError) {
        *self.0.book_error.lock().unwrap() = Some(error);
    }
}

impl ScheduleBackend for MockScheduleBackend {
    fn book(
        &self,
        _date: NaiveDate,
        _venue: &str,
        _title: &str,
        _start: TimeOfDay,
        _end: TimeOfDay,
    ) -> Result<(), BookingError> {
        self.0.calls_to_book.fetch_add(1, Ordering::SeqCst);
        match self.0.book_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn cancel(&self, _date: NaiveDate, _venue: &str, _start: TimeOfDay) -> Option<Event> {
        self.0.calls_to_cancel.fetch_add(1, Ordering::SeqCst);
        self.0.cancelled.lock().unwrap().clone()
    }

    fn schedule(&self, _date: NaiveDate) -> DaySchedule {
        self.0.calls_to_schedule.fetch_add(1, Ordering::SeqCst);
        self.0.schedule.lock().unwrap().clone()
    }

    fn free_slots(
        &self,
        _date: NaiveDate,
        _venue: &str,
        _duration: u16,
        limit: usize,
    ) -> Vec<Slot> {
        self.0.calls_to_free_slots.fetch_add(1, Ordering::SeqCst);
        let mut slots = self.0.free_slots.lock().unwrap().clone();
        slots.truncate(limit);
        slots
    }
}
