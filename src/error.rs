use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::domain::ValidationError;
use crate::intake::IntakeError;
use crate::repo::StorageError;

pub type RestResult<T> = Result<T, RestError>;

const INTERNAL_ERROR_MESSAGE: &str = "Внутренняя ошибка сервера";

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),
}

impl RestError {
    pub fn from_json_error(e: JsonPayloadError) -> Self {
        match e {
            JsonPayloadError::Deserialize(e) => Self::Validation {
                field: None,
                message: e.to_string(),
            },
            other => Self::BadRequest(other.to_string()),
        }
    }

    pub fn from_query_error(e: QueryPayloadError) -> Self {
        Self::BadRequest(e.to_string())
    }

    /// Ill-typed path segments, e.g. a non-numeric id
    pub fn from_path_error(e: PathError) -> Self {
        Self::Validation {
            field: None,
            message: e.to_string(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(e: ValidationError) -> Self {
        Self::Validation {
            field: Some(e.field),
            message: e.reason,
        }
    }
}

impl From<StorageError> for RestError {
    fn from(e: StorageError) -> Self {
        tracing::error!(error.cause_chain = ?e, "Storage failure");
        Self::InternalError("Database error".into())
    }
}

impl From<IntakeError> for RestError {
    fn from(e: IntakeError) -> Self {
        match e {
            IntakeError::Rejected(e) => e.into(),
            IntakeError::PersistenceFailed(e) => e.into(),
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: bool,
    message: &'a str,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (message, field) = match self {
            Self::Validation { field, message } => (message.as_str(), *field),
            Self::BadRequest(message) | Self::NotFound(message) => (message.as_str(), None),
            // Internal details stay in the logs
            Self::InternalError(_) => (INTERNAL_ERROR_MESSAGE, None),
        };

        HttpResponse::build(status).json(ErrorEnvelope {
            error: true,
            message,
            status_code: status.as_u16(),
            field,
        })
    }
}
