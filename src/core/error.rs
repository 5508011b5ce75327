//! Typed error handling for the pizzeria backend
//!
//! Every fallible operation in the crate returns [`PizzeriaResult`], so the
//! REST layer can turn any failure into a status code and a JSON body
//! without string matching.
//!
//! # Error Categories
//!
//! - [`EntityError`]: identity conflicts and missing records
//! - [`ValidationError`]: rejected request payloads
//! - [`QueryError`]: malformed criteria, paging or sort parameters
//! - [`StorageError`]: failures reported by an entity store
//! - [`ConfigError`]: configuration loading problems
//!
//! # Example
//!
//! ```rust,ignore
//! match service.find_one(id).await? {
//!     Some(dto) => Ok(Json(dto)),
//!     None => Err(EntityError::NotFound {
//!         entity_type: "topping".to_string(),
//!         id,
//!     }
//!     .into()),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the crate
#[derive(Debug)]
pub enum PizzeriaError {
    /// Identity and lookup errors
    Entity(EntityError),

    /// Payload validation errors
    Validation(ValidationError),

    /// Criteria, paging and sorting errors
    Query(QueryError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Errors that should not happen in normal operation
    Internal(String),
}

impl fmt::Display for PizzeriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PizzeriaError::Entity(e) => write!(f, "{}", e),
            PizzeriaError::Validation(e) => write!(f, "{}", e),
            PizzeriaError::Query(e) => write!(f, "{}", e),
            PizzeriaError::Storage(e) => write!(f, "{}", e),
            PizzeriaError::Config(e) => write!(f, "{}", e),
            PizzeriaError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PizzeriaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PizzeriaError::Entity(e) => Some(e),
            PizzeriaError::Validation(e) => Some(e),
            PizzeriaError::Query(e) => Some(e),
            PizzeriaError::Storage(e) => Some(e),
            PizzeriaError::Config(e) => Some(e),
            PizzeriaError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PizzeriaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PizzeriaError::Entity(e) => e.status_code(),
            PizzeriaError::Validation(_) => StatusCode::BAD_REQUEST,
            PizzeriaError::Query(_) => StatusCode::BAD_REQUEST,
            PizzeriaError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PizzeriaError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PizzeriaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PizzeriaError::Entity(e) => e.error_code(),
            PizzeriaError::Validation(_) => "VALIDATION_ERROR",
            PizzeriaError::Query(e) => e.error_code(),
            PizzeriaError::Storage(_) => "STORAGE_ERROR",
            PizzeriaError::Config(_) => "CONFIG_ERROR",
            PizzeriaError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            PizzeriaError::Entity(e) => Some(e.details()),
            PizzeriaError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for PizzeriaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity identity and lookups
#[derive(Debug)]
pub enum EntityError {
    /// No record with this identifier
    NotFound { entity_type: String, id: i64 },

    /// A new entity was submitted with an identifier
    IdExists { entity_type: String },

    /// An update was submitted without an identifier
    IdNull { entity_type: String },

    /// The identifier in the body differs from the one in the path
    IdInvalid {
        entity_type: String,
        path_id: i64,
        body_id: i64,
    },

    /// An update references an identifier that is not stored
    IdNotFound { entity_type: String, id: i64 },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::IdExists { entity_type } => {
                write!(f, "A new {} cannot already have an ID", entity_type)
            }
            EntityError::IdNull { entity_type } => {
                write!(f, "Invalid id: {} has no ID", entity_type)
            }
            EntityError::IdInvalid {
                entity_type,
                path_id,
                body_id,
            } => write!(
                f,
                "Invalid ID: {} path id '{}' does not match body id '{}'",
                entity_type, path_id, body_id
            ),
            EntityError::IdNotFound { entity_type, id } => {
                write!(f, "Entity not found: {} with id '{}'", entity_type, id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::IdExists { .. } => StatusCode::BAD_REQUEST,
            EntityError::IdNull { .. } => StatusCode::BAD_REQUEST,
            EntityError::IdInvalid { .. } => StatusCode::BAD_REQUEST,
            EntityError::IdNotFound { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::IdExists { .. } => "ID_EXISTS",
            EntityError::IdNull { .. } => "ID_NULL",
            EntityError::IdInvalid { .. } => "ID_INVALID",
            EntityError::IdNotFound { .. } => "ID_NOT_FOUND",
        }
    }

    pub fn entity_type(&self) -> &str {
        match self {
            EntityError::NotFound { entity_type, .. }
            | EntityError::IdExists { entity_type }
            | EntityError::IdNull { entity_type }
            | EntityError::IdInvalid { entity_type, .. }
            | EntityError::IdNotFound { entity_type, .. } => entity_type,
        }
    }

    fn details(&self) -> serde_json::Value {
        match self {
            EntityError::NotFound { entity_type, id }
            | EntityError::IdNotFound { entity_type, id } => serde_json::json!({
                "entity_type": entity_type,
                "id": id
            }),
            EntityError::IdInvalid {
                entity_type,
                path_id,
                body_id,
            } => serde_json::json!({
                "entity_type": entity_type,
                "path_id": path_id,
                "body_id": body_id
            }),
            EntityError::IdExists { entity_type } | EntityError::IdNull { entity_type } => {
                serde_json::json!({ "entity_type": entity_type })
            }
        }
    }
}

impl From<EntityError> for PizzeriaError {
    fn from(err: EntityError) -> Self {
        PizzeriaError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request payload validation
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation errors reported by `validator`
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not valid JSON for the target type
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldValidationError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<ValidationError> for PizzeriaError {
    fn from(err: ValidationError) -> Self {
        PizzeriaError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for PizzeriaError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PizzeriaError::Validation(errors.into())
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while reading criteria, page and sort parameters
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// `<field>.<op>` names a field that cannot be filtered
    UnknownField { field: String },

    /// The operator suffix is not supported for this field
    UnknownOperator { field: String, operator: String },

    /// A parameter value could not be parsed
    InvalidValue {
        parameter: String,
        value: String,
        message: String,
    },

    /// A `sort` parameter names an unknown field or direction
    InvalidSort { value: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownField { field } => {
                write!(f, "Unknown filter field: {}", field)
            }
            QueryError::UnknownOperator { field, operator } => {
                write!(f, "Unknown filter operator '{}' for field '{}'", operator, field)
            }
            QueryError::InvalidValue {
                parameter,
                value,
                message,
            } => write!(
                f,
                "Invalid value '{}' for parameter '{}': {}",
                value, parameter, message
            ),
            QueryError::InvalidSort { value } => write!(f, "Invalid sort: {}", value),
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::UnknownField { .. } => "UNKNOWN_FILTER_FIELD",
            QueryError::UnknownOperator { .. } => "UNKNOWN_FILTER_OPERATOR",
            QueryError::InvalidValue { .. } => "INVALID_QUERY_VALUE",
            QueryError::InvalidSort { .. } => "INVALID_SORT",
        }
    }
}

impl From<QueryError> for PizzeriaError {
    fn from(err: QueryError) -> Self {
        PizzeriaError::Query(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { backend: String, message: String },

    /// Data integrity error
    IntegrityError { message: String },

    /// Backend not compiled in or not reachable
    Unavailable { backend: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::IntegrityError { message } => {
                write!(f, "Data integrity error: {}", message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for PizzeriaError {
    fn from(err: StorageError) -> Self {
        PizzeriaError::Storage(err)
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration loading
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file not found
    FileNotFound { path: String },

    /// YAML could not be parsed
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },

    /// A setting has an unusable value
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ParseError { file, message } => match file {
                Some(file) => write!(f, "Failed to parse {}: {}", file, message),
                None => write!(f, "Failed to parse configuration: {}", message),
            },
            ConfigError::IoError { message } => {
                write!(f, "Failed to read configuration: {}", message)
            }
            ConfigError::InvalidValue { key, message } => {
                write!(f, "Invalid configuration value for '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PizzeriaError {
    fn from(err: ConfigError) -> Self {
        PizzeriaError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for PizzeriaError {
    fn from(err: serde_json::Error) -> Self {
        PizzeriaError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for PizzeriaError {
    fn from(err: serde_yaml::Error) -> Self {
        PizzeriaError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for PizzeriaError {
    fn from(err: std::io::Error) -> Self {
        PizzeriaError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for pizzeria operations
pub type PizzeriaResult<T> = Result<T, PizzeriaError>;
