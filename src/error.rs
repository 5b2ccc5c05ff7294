use axum::extract::rejection::JsonRejection;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CafeError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid payload: {0}")]
    Payload(#[from] JsonRejection),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl CafeError {
    pub fn coffee_not_found(id: i64) -> Self {
        CafeError::NotFound {
            entity: "coffee",
            id,
        }
    }

    pub fn pug_not_found(id: i64) -> Self {
        CafeError::NotFound { entity: "pug", id }
    }

    /// Classify constraint violations reported by SQLite; anything else stays a database error.
    pub fn from_db(e: SqlxError) -> Self {
        let violation = e.as_database_error().and_then(|db| {
            if db.is_foreign_key_violation() {
                Some(CafeError::InvalidReference(db.message().to_string()))
            } else if db.is_unique_violation() {
                Some(CafeError::Conflict(db.message().to_string()))
            } else {
                None
            }
        });
        violation.unwrap_or(CafeError::DatabaseError(e))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CafeError::NotFound { .. } => StatusCode::NOT_FOUND,
            CafeError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CafeError::Conflict(_) => StatusCode::CONFLICT,
            CafeError::Payload(rejection) => rejection.status(),
            CafeError::Json(_) | CafeError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CafeError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_body = match &self {
            CafeError::NotFound { .. } => ApiErrorBody {
                code: "NOT_FOUND".to_string(),
                message: self.to_string(),
            },
            CafeError::InvalidReference(_) => ApiErrorBody {
                code: "INVALID_REFERENCE".to_string(),
                message: "Referenced row does not exist.".to_string(),
            },
            CafeError::Conflict(_) => ApiErrorBody {
                code: "CONFLICT".to_string(),
                message: "A row with the same unique value already exists.".to_string(),
            },
            CafeError::Payload(rejection) => ApiErrorBody {
                code: "INVALID_PAYLOAD".to_string(),
                message: rejection.body_text(),
            },
            CafeError::Json(_) | CafeError::DatabaseError(_) => {
                tracing::error!(error = %self, "request failed");
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                }
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
