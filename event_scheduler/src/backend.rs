use crate::{
    error::BookingError,
    types::{DaySchedule, Event, Slot, TimeOfDay},
};
use chrono::NaiveDate;

pub trait ScheduleBackend: Clone + Send + Sync + 'static {
    fn book(
        &self,
        date: NaiveDate,
        venue: &str,
        title: &str,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<(), BookingError>;
    /// Cancels the event starting at `start`; `None` if there is none.
    fn cancel(&self, date: NaiveDate, venue: &str, start: TimeOfDay) -> Option<Event>;
    fn schedule(&self, date: NaiveDate) -> DaySchedule;
    fn free_slots(&self, date: NaiveDate, venue: &str, duration: u16, limit: usize) -> Vec<Slot>;
}
