use carpark_app::ParkingService;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub service: ParkingService,
}

impl AppState {
    pub fn new(service: ParkingService) -> SharedState {
        Arc::new(Self { service })
    }
}
