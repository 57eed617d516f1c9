use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner and registration data for a vehicle, as reported by a registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDetails {
    pub owner_name: String,
    pub state: String,
    pub pincode: String,
    pub chassis_number: String,
    pub engine_number: String,
    pub color: String,
    pub reg_date: String,
    pub vehicle_class: String,
    pub fuel_type: String,
    pub vehicle_manufacturer: String,
    pub model: String,
}

impl VehicleDetails {
    /// True when no field carries any data
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The current or most recent parking occupancy of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSession {
    /// Unique identifier
    pub id: Uuid,

    /// Normalized license plate (natural key)
    pub car_number: String,

    #[serde(default)]
    pub in_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub out_time: Option<DateTime<Utc>>,

    /// Whether the vehicle is currently inside the lot
    #[serde(default)]
    pub is_parked: bool,

    /// Duration of the last completed stay, in minutes
    #[serde(default)]
    pub last_parking_duration: Option<i64>,

    /// Fee charged for the last completed stay
    #[serde(default)]
    pub cost: Option<i64>,

    /// Registry data captured when the record was first created
    #[serde(flatten)]
    pub vehicle: VehicleDetails,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSession {
    /// A record for a vehicle seen for the first time, already parked
    pub fn new(car_number: String, vehicle: VehicleDetails, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_number,
            in_time: Some(now),
            out_time: None,
            is_parked: true,
            last_parking_duration: None,
            cost: None,
            vehicle,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_parked() {
        let now = Utc::now();
        let session = ParkingSession::new("MH12AB1234".into(), VehicleDetails::default(), now);
        assert!(session.is_parked);
        assert_eq!(session.in_time, Some(now));
        assert_eq!(session.out_time, None);
        assert_eq!(session.cost, None);
    }

    #[test]
    fn test_json_field_names() {
        let now = Utc::now();
        let mut vehicle = VehicleDetails::default();
        vehicle.owner_name = "A. Kumar".into();
        let session = ParkingSession::new("MH12AB1234".into(), vehicle, now);

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["carNumber"], "MH12AB1234");
        assert_eq!(value["isParked"], true);
        assert_eq!(value["ownerName"], "A. Kumar");
        assert!(value["cost"].is_null());
        assert!(value.get("vehicle").is_none());
    }

    #[test]
    fn test_missing_metadata_defaults_to_empty() {
        let json = r#"{
            "id": "7b8f0c1e-3a43-4f5e-9d52-0d1a5c4b9e11",
            "carNumber": "KA01AB1234",
            "isParked": false,
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:00:00Z"
        }"#;
        let session: ParkingSession = serde_json::from_str(json).unwrap();
        assert!(session.vehicle.is_empty());
        assert_eq!(session.in_time, None);
    }
}
