//! Vehicle master data loaded from a TOML file
//!
//! Offline registry for lots that keep their own list of known vehicles
//! (staff cars, monthly pass holders).

use async_trait::async_trait;
use carpark_domain::Plate;
use carpark_types::{ConfigError, Error, Result, VehicleDetails};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::VehicleRegistry;

/// Container for parsing vehicles.toml
#[derive(Debug, Deserialize)]
struct VehicleMasterConfig {
    #[serde(default)]
    vehicles: Vec<MasterEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MasterEntry {
    car_number: String,
    owner_name: String,
    state: String,
    pincode: String,
    chassis_number: String,
    engine_number: String,
    color: String,
    reg_date: String,
    vehicle_class: String,
    fuel_type: String,
    vehicle_manufacturer: String,
    model: String,
}

impl From<MasterEntry> for VehicleDetails {
    fn from(entry: MasterEntry) -> Self {
        Self {
            owner_name: entry.owner_name,
            state: entry.state,
            pincode: entry.pincode,
            chassis_number: entry.chassis_number,
            engine_number: entry.engine_number,
            color: entry.color,
            reg_date: entry.reg_date,
            vehicle_class: entry.vehicle_class,
            fuel_type: entry.fuel_type,
            vehicle_manufacturer: entry.vehicle_manufacturer,
            model: entry.model,
        }
    }
}

/// Vehicle master data keyed by normalized plate
#[derive(Debug)]
pub struct VehicleMasterRegistry {
    vehicles: HashMap<String, VehicleDetails>,
}

impl VehicleMasterRegistry {
    /// Load vehicle master data from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read vehicle master file {}: {}",
                path.display(),
                e
            )))
        })?;

        Self::load_from_str(&content)
    }

    /// Load vehicle master data from TOML string
    ///
    /// Entries whose `car_number` is not a valid plate are skipped with a warning.
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let config: VehicleMasterConfig = toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse vehicle master TOML: {}",
                e
            )))
        })?;

        let mut vehicles = HashMap::new();
        for entry in config.vehicles {
            match Plate::parse(&entry.car_number) {
                Ok(plate) => {
                    vehicles.insert(plate.into_inner(), entry.into());
                }
                Err(e) => tracing::warn!(car_number = %entry.car_number, "Skipping vehicle master entry: {e}"),
            }
        }

        Ok(Self { vehicles })
    }

    pub fn get_vehicle(&self, plate: &str) -> Option<&VehicleDetails> {
        self.vehicles.get(plate)
    }

    /// Get the total number of registered vehicles
    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}

#[async_trait]
impl VehicleRegistry for VehicleMasterRegistry {
    fn name(&self) -> &'static str {
        "vehicle-master"
    }

    async fn lookup(&self, plate: &Plate) -> Result<Option<VehicleDetails>> {
        Ok(self.vehicles.get(plate.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
[[vehicles]]
car_number = "MH 12AB 1234"
owner_name = "Sahil K"
color = "WHITE"
fuel_type = "PETROL"

[[vehicles]]
car_number = "KA01CD5678"
owner_name = "R. Rao"
vehicle_class = "Motor Car(LMV)"

[[vehicles]]
car_number = "not a plate"
owner_name = "Nobody"
"#;

    #[test]
    fn test_load_from_str() {
        let registry = VehicleMasterRegistry::load_from_str(TEST_TOML).unwrap();
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_keys_are_normalized() {
        let registry = VehicleMasterRegistry::load_from_str(TEST_TOML).unwrap();
        let vehicle = registry.get_vehicle("MH12AB1234").unwrap();
        assert_eq!(vehicle.owner_name, "Sahil K");
        assert_eq!(vehicle.fuel_type, "PETROL");
    }

    #[test]
    fn test_invalid_toml() {
        let err = VehicleMasterRegistry::load_from_str("[[vehicles]\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_lookup() {
        let registry = VehicleMasterRegistry::load_from_str(TEST_TOML).unwrap();

        let known = Plate::parse("KA01CD5678").unwrap();
        let details = registry.lookup(&known).await.unwrap().unwrap();
        assert_eq!(details.vehicle_class, "Motor Car(LMV)");

        let unknown = Plate::parse("TN09ZZ0001").unwrap();
        assert!(registry.lookup(&unknown).await.unwrap().is_none());
    }
}
