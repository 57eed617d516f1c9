use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use carpark_domain::{ParkingEvent, Plate};
use carpark_types::ParkingSession;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarNumber {
    #[serde(default)]
    car_number: Option<String>,
}

pub async fn upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ParkingEvent>, ApiError> {
    let mut bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            bytes = Some(data.to_vec());
            break;
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::BadRequest("No file uploaded.".to_string()))?;
    let resolution = state
        .service
        .record_upload(bytes)
        .await
        .map_err(|e| ApiError::from_service("Error processing image", e))?;
    Ok(Json(resolution.event))
}

pub async fn create_car_number(
    State(state): State<SharedState>,
    payload: Result<Json<CreateCarNumber>, JsonRejection>,
) -> Result<Json<ParkingEvent>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let raw = payload.car_number.unwrap_or_default();
    let plate = Plate::parse(&raw).map_err(|e| ApiError::from_service("Error recording car", e))?;

    let resolution = state
        .service
        .record_plate(&plate)
        .await
        .map_err(|e| ApiError::from_service("Error recording car", e))?;
    Ok(Json(resolution.event))
}

pub async fn get_car(
    State(state): State<SharedState>,
    Path(car_number): Path<String>,
) -> Result<Json<ParkingSession>, ApiError> {
    let session = state
        .service
        .find(&car_number)
        .map_err(|e| ApiError::from_service("Error fetching car details", e))?;
    Ok(Json(session))
}

pub async fn list_cars(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ParkingSession>>, ApiError> {
    let sessions = state
        .service
        .list()
        .map_err(|e| ApiError::from_service("Error fetching all car details", e))?;
    Ok(Json(sessions))
}

pub async fn delete_car(
    State(state): State<SharedState>,
    Path(car_number): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .service
        .remove(&car_number)
        .await
        .map_err(|e| ApiError::from_service("Error deleting car", e))?;
    Ok(Json(serde_json::json!({ "message": "Car record deleted" })))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
