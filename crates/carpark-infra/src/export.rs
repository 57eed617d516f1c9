//! CSV export of parking sessions

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use carpark_types::{ParkingSession, Result};
use chrono::{DateTime, SecondsFormat, Utc};

const HEADER: [&str; 12] = [
    "car_number",
    "status",
    "in_time",
    "out_time",
    "duration_minutes",
    "cost",
    "owner_name",
    "state",
    "vehicle_class",
    "vehicle_manufacturer",
    "model",
    "color",
];

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write sessions as CSV with a header row
pub fn write_sessions_csv<W: Write>(sessions: &[ParkingSession], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER).map_err(io::Error::from)?;

    for session in sessions {
        let status = if session.is_parked { "parked" } else { "left" };
        let in_time = timestamp(session.in_time);
        let out_time = timestamp(session.out_time);
        let duration = number(session.last_parking_duration);
        let cost = number(session.cost);
        let vehicle = &session.vehicle;
        let record: [&str; 12] = [
            &session.car_number,
            status,
            &in_time,
            &out_time,
            &duration,
            &cost,
            &vehicle.owner_name,
            &vehicle.state,
            &vehicle.vehicle_class,
            &vehicle.vehicle_manufacturer,
            &vehicle.model,
            &vehicle.color,
        ];
        csv_writer.write_record(record).map_err(io::Error::from)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export sessions to a CSV file, returning the number of rows written
pub fn export_sessions_csv(sessions: &[ParkingSession], path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    write_sessions_csv(sessions, file)?;
    tracing::info!(path = %path.display(), rows = sessions.len(), "Exported sessions");
    Ok(sessions.len())
}
