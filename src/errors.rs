use sea_orm::error::DbErr;
use sea_orm::SqlErr;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[serde(skip)]
        DbErr,
    ),

    /// A natural key handed to an upsert was empty or missing
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A uniqueness constraint rejected a write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Lineage cycle: strain {0} would become its own ancestor")]
    LineageCycle(Uuid),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::ConstraintViolation(detail)
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::from(error.into_db_err())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "database_error",
            Self::InvalidKey(_) => "invalid_key",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::NotFound(_) => "not_found",
            Self::ValidationError(_) => "validation_error",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::LineageCycle(_) => "lineage_cycle",
            Self::SerializationError(_) => "serialization_error",
            Self::EventError(_) => "event_error",
            Self::InternalError(_) | Self::Other(_) => "internal_error",
        }
    }

    /// Whether the caller caused the failure (bad key, bad payload, duplicate) rather than the store.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKey(_)
                | Self::ConstraintViolation(_)
                | Self::NotFound(_)
                | Self::ValidationError(_)
                | Self::InvalidOperation(_)
                | Self::LineageCycle(_)
        )
    }
}

pub type AppError = ServiceError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_db_errors_stay_database_errors() {
        let err = ServiceError::db_error("connection reset");
        assert!(matches!(err, ServiceError::DatabaseError(_)));
        assert_eq!(err.code(), "database_error");
        assert!(!err.is_caller_error());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ServiceError::InvalidKey("".into()).code(), "invalid_key");
        assert_eq!(
            ServiceError::ConstraintViolation("name".into()).code(),
            "constraint_violation"
        );
        assert_eq!(ServiceError::LineageCycle(Uuid::nil()).code(), "lineage_cycle");
        assert_eq!(
            ServiceError::Other(anyhow::anyhow!("boom")).code(),
            "internal_error"
        );
    }

    #[test]
    fn caller_errors_are_distinguished() {
        assert!(ServiceError::InvalidKey("sku".into()).is_caller_error());
        assert!(ServiceError::ConstraintViolation("dup".into()).is_caller_error());
        assert!(!ServiceError::EventError("closed".into()).is_caller_error());
    }

    #[test]
    fn json_errors_map_to_serialization_errors() {
        let parse_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err: ServiceError = parse_err.into();
        assert_eq!(err.code(), "serialization_error");
    }
}
