//! Session lifecycle: decides entry, exit, or re-entry for a sighted plate
//!
//! Pure logic. The caller looks up the existing record, supplies the current
//! time, and persists the returned session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use carpark_types::{ParkingSession, VehicleDetails};

use crate::model::{Plate, Tariff};

/// Which transition a sighting will cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Entry,
    Exit,
    Reentry,
}

/// Confirmation returned to the client for each transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ParkingEvent {
    #[serde(rename_all = "camelCase")]
    Entered {
        message: &'static str,
        car_number: String,
        in_time: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Exited {
        message: &'static str,
        car_number: String,
        duration_minutes: i64,
        cost: i64,
    },
    #[serde(rename_all = "camelCase")]
    Reentered {
        message: &'static str,
        car_number: String,
        in_time: DateTime<Utc>,
    },
}

impl ParkingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ParkingEvent::Entered { .. } => EventKind::Entry,
            ParkingEvent::Exited { .. } => EventKind::Exit,
            ParkingEvent::Reentered { .. } => EventKind::Reentry,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ParkingEvent::Entered { message, .. }
            | ParkingEvent::Exited { message, .. }
            | ParkingEvent::Reentered { message, .. } => message,
        }
    }

    pub fn car_number(&self) -> &str {
        match self {
            ParkingEvent::Entered { car_number, .. }
            | ParkingEvent::Exited { car_number, .. }
            | ParkingEvent::Reentered { car_number, .. } => car_number,
        }
    }
}

/// The record to persist and the response to return
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub session: ParkingSession,
    pub event: ParkingEvent,
}

/// Resolve a sighting of `plate` at `now`
///
/// `details` is only used when a new record is created; exits and re-entries
/// keep whatever metadata the record already has.
pub fn resolve_event(
    plate: &Plate,
    existing: Option<ParkingSession>,
    details: Option<VehicleDetails>,
    now: DateTime<Utc>,
    tariff: &Tariff,
) -> Resolution {
    match existing {
        None => enter(plate, details.unwrap_or_default(), now),
        Some(session) if session.is_parked => exit(session, now, tariff),
        Some(session) => reenter(session, now),
    }
}

fn enter(plate: &Plate, details: VehicleDetails, now: DateTime<Utc>) -> Resolution {
    let session = ParkingSession::new(plate.to_string(), details, now);
    let event = ParkingEvent::Entered {
        message: "Car entered parking lot",
        car_number: session.car_number.clone(),
        in_time: now,
    };
    Resolution { session, event }
}

fn exit(mut session: ParkingSession, now: DateTime<Utc>, tariff: &Tariff) -> Resolution {
    let duration_minutes = session
        .in_time
        .map(|in_time| tariff.duration_minutes(in_time, now))
        .unwrap_or(0);
    let cost = tariff.cost(duration_minutes);

    session.out_time = Some(now);
    session.is_parked = false;
    session.last_parking_duration = Some(duration_minutes);
    session.cost = Some(cost);
    session.updated_at = now;

    let event = ParkingEvent::Exited {
        message: "Car left the parking lot.",
        car_number: session.car_number.clone(),
        duration_minutes,
        cost,
    };
    Resolution { session, event }
}

fn reenter(mut session: ParkingSession, now: DateTime<Utc>) -> Resolution {
    session.in_time = Some(now);
    session.out_time = None;
    session.cost = None;
    session.is_parked = true;
    session.updated_at = now;

    let event = ParkingEvent::Reentered {
        message: "Car re-entered the parking lot.",
        car_number: session.car_number.clone(),
        in_time: now,
    };
    Resolution { session, event }
}
