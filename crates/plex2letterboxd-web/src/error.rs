use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use letterboxd_export_core::ExportError;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The form was submitted without selecting a user.
    MissingUsername,
    Export(ExportError),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MissingUsername => {
                (StatusCode::BAD_REQUEST, "No user selected").into_response()
            }
            AppError::Export(err) => {
                error!("export failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
