use crate::error::BookingError;
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Snapshot of one date: venue name to its events, ascending by start.
pub type DaySchedule = BTreeMap<String, Vec<Event>>;

const MINUTES_PER_HOUR: u16 = 60;

/// Wall-clock time with minute resolution, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);
    pub const LAST_MINUTE: Self = Self(23 * MINUTES_PER_HOUR + 59);

    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute >= MINUTES_PER_HOUR {
            return None;
        }
        Some(Self(hour * MINUTES_PER_HOUR + minute))
    }

    /// For constants; out-of-range input fails const evaluation.
    pub const fn at(hour: u16, minute: u16) -> Self {
        assert!(hour <= 23 && minute < MINUTES_PER_HOUR, "time of day out of range");
        Self(hour * MINUTES_PER_HOUR + minute)
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= Self::LAST_MINUTE.0).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / MINUTES_PER_HOUR
    }

    pub fn minute(self) -> u16 {
        self.0 % MINUTES_PER_HOUR
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeError {
    input: String,
}

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time of day {:?}, expected HH:MM", self.input)
    }
}

impl std::error::Error for ParseTimeError {}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    /// Accepts `HH:MM` and the single-digit hour form `H:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseTimeError { input: s.to_owned() };
        let (hour, minute) = s.split_once(':').ok_or_else(error)?;

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
            return Err(error());
        }
        if !all_digits(hour) || !all_digits(minute) {
            return Err(error());
        }

        let hour = hour.parse().map_err(|_| error())?;
        let minute = minute.parse().map_err(|_| error())?;
        Self::new(hour, minute).ok_or_else(error)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Slot {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Touching endpoints (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// A booked event. Immutable once created; `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    title: String,
    slot: Slot,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, BookingError> {
        Ok(Self {
            title: title.into(),
            slot: Slot::new(start, end)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn start(&self) -> TimeOfDay {
        self.slot.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.slot.end
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut event = serializer.serialize_struct("Event", 3)?;
        event.serialize_field("title", &self.title)?;
        event.serialize_field("startTime", &self.slot.start)?;
        event.serialize_field("endTime", &self.slot.end)?;
        event.end()
    }
}
