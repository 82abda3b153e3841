use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use validator::ValidationErrors;

#[derive(Debug, Display, PartialEq)]
pub enum AppError {
    #[display("{_0}")]
    InvalidInput(String),

    #[display("{_0}")]
    NotFound(String),

    #[display("{_0}")]
    PayloadTooLarge(String),

    #[display("{_0}")]
    UnsupportedMediaType(String),

    #[display("{_0}")]
    StorageError(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({"error": self.to_string()}))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Replaces the generic message of a `StorageError` with an
    /// operation-specific one. Other variants pass through untouched.
    pub fn storage_context(self, message: &str) -> Self {
        match self {
            AppError::StorageError(_) => AppError::StorageError(message.to_string()),
            other => other,
        }
    }

    /// Replaces the message of a `NotFound`.
    pub fn not_found_context(self, message: &str) -> Self {
        match self {
            AppError::NotFound(_) => AppError::NotFound(message.to_string()),
            other => other,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect::<Vec<_>>();
        messages.sort();

        AppError::InvalidInput(messages.join(", "))
    }
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        AppError::InvalidInput(format!("JSON payload error: {}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => {
                tracing::error!("Database error: {}", err);
                AppError::StorageError("Database error".into())
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("File storage error: {}", err);
        AppError::StorageError("File storage error".into())
    }
}
