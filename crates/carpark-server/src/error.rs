use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carpark_types::Error;

pub const CAR_NOT_FOUND: &str = "Car not found";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Car not found")]
    NotFound,
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        source: Error,
    },
}

impl ApiError {
    /// Classify a service error; `context` becomes the message of a 500 body
    pub fn from_service(context: &'static str, err: Error) -> Self {
        if err.is_client_error() {
            return ApiError::BadRequest(err.to_string());
        }
        match err {
            Error::NotFound(_) => ApiError::NotFound,
            source => ApiError::Internal { context, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "message": msg, "error": msg }),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "message": CAR_NOT_FOUND }),
            ),
            ApiError::Internal { context, source } => {
                tracing::error!("{context}: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "message": context, "error": source.to_string() }),
                )
            }
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn validation_returns_400() {
        let err = ApiError::from_service(
            "Error processing image",
            Error::Validation("No valid number plate found.".into()),
        );
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "No valid number plate found.");
    }

    #[tokio::test]
    async fn invalid_image_returns_400() {
        let err = ApiError::from_service(
            "Error processing image",
            Error::InvalidImageFormat("Unrecognized image data".into()),
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let err = ApiError::from_service("Error fetching car details", Error::NotFound("car X".into()));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Car not found");
    }

    #[tokio::test]
    async fn upstream_returns_500_with_detail() {
        let err = ApiError::from_service(
            "Error processing image",
            Error::Upstream("Gemini returned 503".into()),
        );
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Error processing image");
        assert_eq!(json["error"], "Upstream service error: Gemini returned 503");
    }
}
