//! Output formatting module

use carpark_domain::ParkingEvent;
use carpark_types::{OutputFormat, ParkingSession, Result};
use chrono::{DateTime, Local, Utc};

fn local_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn output_event(output_format: OutputFormat, event: &ParkingEvent) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(event)?);
        return Ok(());
    }

    println!("{}", event.message());
    println!("Car number:      {}", event.car_number());
    match event {
        ParkingEvent::Entered { in_time, .. } | ParkingEvent::Reentered { in_time, .. } => {
            println!("In time:         {}", local_time(Some(*in_time)));
        }
        ParkingEvent::Exited {
            duration_minutes,
            cost,
            ..
        } => {
            println!("Duration:        {} min", duration_minutes);
            println!("Cost:            {}", cost);
        }
    }
    Ok(())
}

pub fn output_session(output_format: OutputFormat, session: &ParkingSession) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }

    println!("\nParking Record");
    println!("==============");
    println!("Car number:      {}", session.car_number);
    println!(
        "Status:          {}",
        if session.is_parked { "Parked" } else { "Left" }
    );
    println!("In time:         {}", local_time(session.in_time));
    println!("Out time:        {}", local_time(session.out_time));
    if let Some(minutes) = session.last_parking_duration {
        println!("Last duration:   {} min", minutes);
    }
    if let Some(cost) = session.cost {
        println!("Cost:            {}", cost);
    }

    let vehicle = &session.vehicle;
    if !vehicle.is_empty() {
        println!("\n--- Vehicle ---");
        println!("Owner:           {}", or_dash(&vehicle.owner_name));
        println!("State:           {}", or_dash(&vehicle.state));
        println!("Class:           {}", or_dash(&vehicle.vehicle_class));
        println!("Manufacturer:    {}", or_dash(&vehicle.vehicle_manufacturer));
        println!("Model:           {}", or_dash(&vehicle.model));
        println!("Color:           {}", or_dash(&vehicle.color));
        println!("Fuel:            {}", or_dash(&vehicle.fuel_type));
    }
    Ok(())
}

pub fn output_sessions(output_format: OutputFormat, sessions: &[ParkingSession]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No parking records.");
        return Ok(());
    }

    println!(
        "{:<12} {:<7} {:<17} {:<17} {:>8} {:>6}",
        "CAR NUMBER", "STATUS", "IN", "OUT", "MINUTES", "COST"
    );
    for s in sessions {
        println!(
            "{:<12} {:<7} {:<17} {:<17} {:>8} {:>6}",
            s.car_number,
            if s.is_parked { "parked" } else { "left" },
            local_time(s.in_time),
            local_time(s.out_time),
            s.last_parking_duration
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into()),
            s.cost.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
        );
    }

    let parked = sessions.iter().filter(|s| s.is_parked).count();
    println!("\n{} record(s), {} parked", sessions.len(), parked);
    Ok(())
}
