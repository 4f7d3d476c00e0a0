use chrono::NaiveDate;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> u16;
    fn bind_address(&self) -> String;
    /// Date to seed with a few demo bookings, if any.
    fn example_events(&self) -> Option<NaiveDate>;
}
