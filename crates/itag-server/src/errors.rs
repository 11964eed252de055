use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use format_lister::ListingError;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Every failure a request can end in. Always rendered as `{"error": "..."}`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Listing(#[from] ListingError),
    #[error("Invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),
    #[error("Failed to encode the response: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Listing(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
