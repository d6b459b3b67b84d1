use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr, SqlErr, sqlx};
use serde_json::json;
use std::fmt;

/// Error kinds surfaced by the services and rendered by the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessError {
    /// Malformed input, rejected before touching storage (400 Bad Request)
    ValidationError { field: String, message: String },
    /// Missing or unusable caller identity (401 Unauthorized)
    Unauthorized { message: String },
    /// Resource not found (404 Not Found)
    NotFound { resource: String, id: String },
    /// Uniqueness conflict (409 Conflict)
    Duplicate { resource: String, field: String },
    /// Foreign-key conflict, e.g. removing a tray that still holds batches (409 Conflict)
    ReferenceViolation { resource: String, message: String },
    /// Connection level failures (502 Bad Gateway)
    ExternalServiceError { service: String, message: String },
    /// Generic application error (500 Internal Server Error)
    InternalError { message: String },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationError { field, message } => {
                write!(f, "Validation error in field '{field}': {message}")
            }
            BusinessError::Unauthorized { message } => write!(f, "Unauthorized: {message}"),
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            BusinessError::ReferenceViolation { resource, message } => {
                write!(f, "{resource} is still referenced: {message}")
            }
            BusinessError::ExternalServiceError { service, message } => {
                write!(f, "External service '{service}' error: {message}")
            }
            BusinessError::InternalError { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for BusinessError {}

impl BusinessError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            BusinessError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            BusinessError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            BusinessError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            BusinessError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE_RESOURCE"),
            BusinessError::ReferenceViolation { .. } => {
                (StatusCode::CONFLICT, "REFERENCE_VIOLATION")
            }
            BusinessError::ExternalServiceError { .. } => {
                (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR")
            }
            BusinessError::InternalError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

/// Convert BusinessError to HTTP responses
impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "type": format!("{self:?}").split(' ').next().unwrap_or("Unknown")
            }
        }));

        (status, body).into_response()
    }
}

/// Maps storage errors onto [`BusinessError`] kinds
pub struct ErrorMapper;

impl ErrorMapper {
    /// Classify a `DbErr` raised while operating on `context` (a resource name)
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        let resource = Self::extract_resource_from_context(context);

        // Constraint violations first, they are reported the same way on every backend
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return BusinessError::Duplicate {
                    resource,
                    field: Self::extract_field_from_constraint(&detail),
                };
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return BusinessError::ReferenceViolation {
                    resource,
                    message: detail,
                };
            }
            _ => {}
        }
        if Self::is_foreign_key_violation(&err) {
            return BusinessError::ReferenceViolation {
                resource,
                message: err.to_string(),
            };
        }

        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource,
                id: Self::extract_id_from_message(&msg),
            },
            DbErr::RecordNotUpdated => BusinessError::NotFound {
                resource,
                id: "unknown".to_string(),
            },
            DbErr::Custom(msg) if msg.starts_with("Validation failed:") => {
                let field = Self::extract_field_from_validation(&msg);
                let message = msg.replace("Validation failed:", "").trim().to_string();
                BusinessError::ValidationError { field, message }
            }
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => BusinessError::ExternalServiceError {
                service: "database".to_string(),
                message: err.to_string(),
            },
            _ => BusinessError::InternalError {
                message: err.to_string(),
            },
        }
    }

    // SQLite reports RESTRICT and deferred FK failures with extended codes
    // that `sql_err` does not classify
    fn is_foreign_key_violation(err: &DbErr) -> bool {
        match err {
            DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
            | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db_err))) => {
                matches!(db_err.code().as_deref(), Some("787" | "1811"))
                    || db_err.message().contains("FOREIGN KEY constraint failed")
            }
            _ => false,
        }
    }

    fn extract_resource_from_context(context: &str) -> String {
        context.replace('_', " ")
    }

    /// Pulls a UUID or integer id out of messages like "Tray with id 'abc' not found"
    fn extract_id_from_message(msg: &str) -> String {
        if let Some(start_pos) = msg.find(" id '") {
            let after_id = &msg[start_pos + 5..];
            if let Some(end_pos) = after_id.find('\'') {
                return after_id[..end_pos].to_string();
            }
        }

        msg.split_whitespace()
            .find_map(|word| {
                let cleaned = word.trim_matches('\'').trim_matches('"');
                if cleaned.len() == 36 && cleaned.matches('-').count() == 4
                    || cleaned.parse::<i64>().is_ok()
                {
                    Some(cleaned.to_string())
                } else {
                    None
                }
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn extract_field_from_validation(msg: &str) -> String {
        msg.split(':')
            .nth(1)
            .and_then(|part| part.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string()
    }

    // Postgres reports the constraint name, SQLite the column list
    fn extract_field_from_constraint(msg: &str) -> String {
        if msg.contains("floor") {
            "floor".to_string()
        } else if msg.contains("name") {
            "name".to_string()
        } else {
            "id".to_string()
        }
    }
}

#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::BusinessError::ValidationError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to DbErr
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;
