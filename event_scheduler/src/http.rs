use crate::backend::ScheduleBackend;
use crate::error::BookingError;
use crate::types::{Event, Slot, TimeOfDay};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{routing::post, Router};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};
use validator::Validate;

const MAX_ALTERNATIVES: usize = 3;

const EVENT_SCHEDULED: &str = "Event scheduled successfully!";
const EVENT_CANCELLED: &str = "Event cancelled successfully!";
const INVALID_REQUEST_FORMAT: &str = "Invalid request format";
const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const INVALID_TIME_FORMAT: &str = "Invalid time format. Use HH:mm format";
const INVALID_DATE_FORMAT: &str = "Invalid date format. Use YYYY-MM-DD format";
const END_NOT_AFTER_START: &str = "End time must be after start time";
const INTERNAL_SERVER_ERROR: &str = "Internal server error";

lazy_static! {
    static ref TIME_FORMAT: Regex = Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    static ref DATE_FORMAT: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    title: Option<String>,
    venue: Option<String>,
    #[validate(regex(path = *DATE_FORMAT))]
    date: Option<String>,
    #[validate(regex(path = *TIME_FORMAT))]
    start_time: Option<String>,
    #[validate(regex(path = *TIME_FORMAT))]
    end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleQuery {
    date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelQuery {
    date: Option<String>,
    venue: Option<String>,
    start_time: Option<String>,
}

/// Identifies a booked event: starts are unique per venue and date.
#[derive(Debug)]
struct EventKey {
    date: NaiveDate,
    venue: String,
    start: TimeOfDay,
}

/// A schedule request that passed every syntactic check.
#[derive(Debug)]
struct NewEvent {
    date: NaiveDate,
    venue: String,
    title: String,
    start: TimeOfDay,
    end: TimeOfDay,
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    if !DATE_FORMAT.is_match(date) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn required(field: Option<String>) -> Result<String, &'static str> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or(ALL_FIELDS_REQUIRED)
}

impl TryFrom<ScheduleRequest> for NewEvent {
    type Error = &'static str;

    /// Checks presence first, then time format, then date format, then ordering.
    fn try_from(request: ScheduleRequest) -> Result<Self, Self::Error> {
        let fields = [
            &request.title,
            &request.venue,
            &request.date,
            &request.start_time,
            &request.end_time,
        ];
        if fields
            .iter()
            .any(|field| field.as_deref().map_or(true, |value| value.trim().is_empty()))
        {
            return Err(ALL_FIELDS_REQUIRED);
        }

        if let Err(errors) = request.validate() {
            let errors = errors.field_errors();
            if errors.contains_key("start_time") || errors.contains_key("end_time") {
                return Err(INVALID_TIME_FORMAT);
            }
            return Err(INVALID_DATE_FORMAT);
        }

        let start: TimeOfDay = required(request.start_time)?
            .parse()
            .map_err(|_| INVALID_TIME_FORMAT)?;
        let end: TimeOfDay = required(request.end_time)?
            .parse()
            .map_err(|_| INVALID_TIME_FORMAT)?;
        let date = parse_date(&required(request.date)?).ok_or(INVALID_DATE_FORMAT)?;
        if start >= end {
            return Err(END_NOT_AFTER_START);
        }

        Ok(Self {
            date,
            venue: required(request.venue)?,
            title: required(request.title)?,
            start,
            end,
        })
    }
}

impl TryFrom<CancelQuery> for EventKey {
    type Error = &'static str;

    fn try_from(query: CancelQuery) -> Result<Self, Self::Error> {
        let venue = required(query.venue)?;
        let date = required(query.date)?;
        let start = required(query.start_time)?;

        if !TIME_FORMAT.is_match(&start) {
            return Err(INVALID_TIME_FORMAT);
        }
        let start = start.parse().map_err(|_| INVALID_TIME_FORMAT)?;
        let date = parse_date(&date).ok_or(INVALID_DATE_FORMAT)?;

        Ok(Self { date, venue, start })
    }
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

pub fn create_app<T: ScheduleBackend>(schedule_backend: T) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(
            "/schedule",
            post(schedule_event::<T>)
                .get(get_schedule::<T>)
                .delete(cancel_event::<T>),
        )
        .with_state(AppState { schedule_backend })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

fn handle_panic(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}

async fn schedule_event<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> Response {
    // Decoded regardless of Content-Type; `null` counts as all fields missing.
    let request = match serde_json::from_slice::<Option<ScheduleRequest>>(&body) {
        Ok(request) => request.unwrap_or_default(),
        Err(err) => {
            warn!(%err, "Rejected malformed schedule request");
            return message(StatusCode::BAD_REQUEST, INVALID_REQUEST_FORMAT);
        }
    };

    let event = match NewEvent::try_from(request) {
        Ok(event) => event,
        Err(reason) => {
            warn!(reason, "Rejected invalid schedule request");
            return message(StatusCode::BAD_REQUEST, reason);
        }
    };

    let result = state.schedule_backend.book(
        event.date,
        &event.venue,
        &event.title,
        event.start,
        event.end,
    );

    match result {
        Ok(()) => {
            info!(
                date = %event.date,
                venue = %event.venue,
                title = %event.title,
                start = %event.start,
                end = %event.end,
                "Event scheduled"
            );
            message(StatusCode::CREATED, EVENT_SCHEDULED)
        }
        Err(BookingError::Conflict { conflicting }) => {
            let booked = conflicting.slot();
            warn!(
                date = %event.date,
                venue = %event.venue,
                requested_start = %event.start,
                requested_end = %event.end,
                booked = %booked,
                "Rejected conflicting booking"
            );

            let duration = Slot {
                start: event.start,
                end: event.end,
            }
            .duration_minutes();
            let alternatives = state.schedule_backend.free_slots(
                event.date,
                &event.venue,
                duration,
                MAX_ALTERNATIVES,
            );
            let body = json!({
                "message": format!(
                    "Time conflict! Slot {} - {} is already booked.",
                    booked.start, booked.end
                ),
                "alternatives": alternatives,
            });
            (StatusCode::CONFLICT, Json(body)).into_response()
        }
        Err(err @ BookingError::InvalidInterval { .. }) => {
            error!(%err, "Booking store rejected a validated interval");
            message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
    }
}

async fn cancel_event<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    query: Result<Query<CancelQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(%rejection, "Rejected malformed cancel request");
            return message(StatusCode::BAD_REQUEST, INVALID_REQUEST_FORMAT);
        }
    };

    let key = match EventKey::try_from(query) {
        Ok(key) => key,
        Err(reason) => {
            warn!(reason, "Rejected invalid cancel request");
            return message(StatusCode::BAD_REQUEST, reason);
        }
    };

    match state
        .schedule_backend
        .cancel(key.date, &key.venue, key.start)
    {
        Some(event) => {
            info!(
                date = %key.date,
                venue = %key.venue,
                title = %event.title(),
                slot = %event.slot(),
                "Event cancelled"
            );
            cancelled(&event)
        }
        None => {
            warn!(date = %key.date, venue = %key.venue, start = %key.start, "No event to cancel");
            let text = format!(
                "No event starting at {} in {} on {}.",
                key.start, key.venue, key.date
            );
            message(StatusCode::NOT_FOUND, &text)
        }
    }
}

fn cancelled(event: &Event) -> Response {
    let body = json!({ "message": EVENT_CANCELLED, "event": event });
    (StatusCode::OK, Json(body)).into_response()
}

async fn get_schedule<T: ScheduleBackend>(
    State(state): State<AppState<T>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Response {
    let date = query
        .ok()
        .and_then(|Query(query)| query.date)
        .as_deref()
        .and_then(parse_date);

    let Some(date) = date else {
        warn!("Rejected schedule query without a valid date");
        return message(StatusCode::BAD_REQUEST, INVALID_DATE_FORMAT);
    };

    debug!(%date, "Loading schedule");
    Json(state.schedule_backend.schedule(date)).into_response()
}
