use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use status::StatusError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error(transparent)]
    Status(#[from] StatusError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedQuery { .. } => StatusCode::BAD_REQUEST,
            AppError::Status { .. } => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let malformed = AppError::MalformedQuery("count: missing field".to_string());
        assert_eq!(malformed.into_response().status(), StatusCode::BAD_REQUEST);

        let unknown = AppError::from(StatusError::UnknownTrackableType("neutral".to_string()));
        assert_eq!(unknown.to_string(), "Unknown trackable type: neutral");
        assert_eq!(unknown.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
