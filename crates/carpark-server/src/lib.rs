//! HTTP API for the parking lot
//!
//! Thin axum layer over `ParkingService`: handlers translate requests, the
//! service does the work, `ApiError` maps failures to status codes.

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use state::{AppState, SharedState};

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use carpark_types::Result;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Uploaded photos can be large phone images
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn app(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/upload", post(routes::upload))
        .route("/create-car-number", post(routes::create_car_number))
        .route("/cars", get(routes::list_cars))
        .route(
            "/car/{car_number}",
            get(routes::get_car).delete(routes::delete_car),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(address: &str, state: SharedState) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use carpark_app::ParkingService;
    use carpark_domain::Tariff;
    use carpark_infra::persistence::MemorySessionRepository;
    use carpark_vision::{PlateExtractor, PlateReader, StagedImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "carpark-test-boundary";

    struct FixedReader(&'static str);

    #[async_trait]
    impl PlateReader for FixedReader {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn read_text(&self, _image: &StagedImage) -> carpark_types::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn test_app(recognized: &'static str) -> (Router, TempDir) {
        let uploads = tempfile::tempdir().unwrap();
        let service = ParkingService::new(Arc::new(MemorySessionRepository::new()), Tariff::default())
            .with_extractor(PlateExtractor::new(Arc::new(FixedReader(recognized))))
            .with_upload_dir(uploads.path().to_path_buf());
        (app(AppState::new(service)), uploads)
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbImage::new(8, 4)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn multipart_request(field: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"car.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, json: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_ok() {
        let (app, _uploads) = test_app("");
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn upload_enters_then_exits() {
        let (app, uploads) = test_app("IND MH 12AB 1234");

        let resp = app
            .clone()
            .oneshot(multipart_request("file", &png_bytes()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["event"], "entered");
        assert_eq!(json["message"], "Car entered parking lot");
        assert_eq!(json["carNumber"], "MH12AB1234");

        let resp = app
            .oneshot(multipart_request("file", &png_bytes()))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["event"], "exited");
        // under a minute parked: at most one started hour
        assert!(json["cost"].as_i64().unwrap() <= 10);

        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn upload_without_file_is_400() {
        let (app, _uploads) = test_app("MH12AB1234");
        let resp = app
            .oneshot(multipart_request("photo", &png_bytes()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], "No file uploaded.");
    }

    #[tokio::test]
    async fn upload_non_image_is_400() {
        let (app, _uploads) = test_app("MH12AB1234");
        let resp = app
            .oneshot(multipart_request("file", b"plain text, not a photo"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_without_plate_is_400() {
        let (app, _uploads) = test_app("random text no plate here");
        let resp = app
            .clone()
            .oneshot(multipart_request("file", &png_bytes()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], "No valid number plate found.");

        let resp = app
            .oneshot(Request::get("/cars").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_car_number_cycle() {
        let (app, _uploads) = test_app("");

        let resp = app
            .clone()
            .oneshot(json_request("/create-car-number", serde_json::json!({ "carNumber": "ka 01cd 5678" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["event"], "entered");

        let resp = app
            .clone()
            .oneshot(json_request("/create-car-number", serde_json::json!({ "carNumber": "KA01CD5678" })))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["event"], "exited");
        assert!(json["durationMinutes"].is_i64());

        let resp = app
            .oneshot(json_request("/create-car-number", serde_json::json!({ "carNumber": "KA01CD5678" })))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["event"], "reentered");
    }

    #[tokio::test]
    async fn create_car_number_requires_plate() {
        let (app, _uploads) = test_app("");

        let resp = app
            .clone()
            .oneshot(json_request("/create-car-number", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], "carNumber is required");

        let resp = app
            .oneshot(json_request(
                "/create-car-number",
                serde_json::json!({ "carNumber": "random text no plate here" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_and_delete_car() {
        let (app, _uploads) = test_app("");
        app.clone()
            .oneshot(json_request("/create-car-number", serde_json::json!({ "carNumber": "MH12AB1234" })))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(Request::get("/car/MH12AB1234").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["carNumber"], "MH12AB1234");
        assert_eq!(json["isParked"], true);

        let resp = app
            .clone()
            .oneshot(Request::delete("/car/MH12AB1234").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(Request::get("/car/MH12AB1234").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["message"], "Car not found");
    }

    #[tokio::test]
    async fn unknown_car_is_404() {
        let (app, _uploads) = test_app("");
        let resp = app
            .oneshot(Request::delete("/car/TN09ZZ0001").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
