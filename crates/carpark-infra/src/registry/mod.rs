//! Vehicle registry clients
//!
//! A registry supplies owner and registration details for a plate. Lookups
//! are best-effort: callers log failures and continue with blank details.

mod rto_api;
mod vehicle_master;

pub use rto_api::{RtoApiRegistry, DEFAULT_RTO_HOST};
pub use vehicle_master::VehicleMasterRegistry;

use async_trait::async_trait;
use carpark_domain::Plate;
use carpark_types::{Result, VehicleDetails};

#[async_trait]
pub trait VehicleRegistry: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Details for a plate, `Ok(None)` when the registry has no record
    async fn lookup(&self, plate: &Plate) -> Result<Option<VehicleDetails>>;
}
