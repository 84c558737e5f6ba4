//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::{
    category::{CategoryId, CategoryType},
    database_id::OperationId,
};

/// The broad classes of failure that callers can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-domain input. The client should fix the request.
    Validation,
    /// A referenced entity does not exist, or a listing matched no rows.
    NotFound,
    /// The request clashes with the current state of the database.
    Conflict,
    /// The database failed in a way the application does not interpret.
    Persistence,
}

impl ErrorKind {
    /// The HTTP status code used when reporting this kind of error.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A category type other than "income" or "expense" was given.
    #[error("\"{0}\" is not a valid category type, expected \"income\" or \"expense\"")]
    InvalidCategoryType(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A period selector other than 1, 7 or 31 days was given.
    #[error("{0} is not a valid period, expected 1, 7 or 31")]
    InvalidPeriod(i64),

    /// An operation amount was negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be finite and not negative")]
    InvalidAmount(f64),

    /// The request could not be parsed into the expected shape.
    ///
    /// Holds the message of the extractor rejection, e.g. a missing query
    /// parameter or malformed JSON body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// No category has the given ID.
    #[error("category {0} could not be found")]
    CategoryNotFound(CategoryId),

    /// No operation has the given ID.
    #[error("operation {0} could not be found")]
    OperationNotFound(OperationId),

    /// A listing of operations matched no rows.
    #[error("no operations found")]
    NoOperationsFound,

    /// A listing of categories matched no rows.
    #[error("no categories found")]
    NoCategoriesFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A category with the same name and type already exists.
    #[error("category \"{name}\" already exists for type {category_type}")]
    DuplicateCategory {
        /// The normalized name that clashed.
        name: String,
        /// The type the name clashed within.
        category_type: CategoryType,
    },

    /// A category cannot be deleted while operations still reference it.
    #[error("category {0} has records and cannot be deleted")]
    CategoryHasOperations(CategoryId),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// The class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCategoryType(_)
            | Error::EmptyCategoryName
            | Error::InvalidPeriod(_)
            | Error::InvalidAmount(_)
            | Error::InvalidRequest(_)
            | Error::InvalidTimezone(_) => ErrorKind::Validation,
            Error::CategoryNotFound(_)
            | Error::OperationNotFound(_)
            | Error::NoOperationsFound
            | Error::NoCategoriesFound
            | Error::NotFound => ErrorKind::NotFound,
            Error::DuplicateCategory { .. } | Error::CategoryHasOperations(_) => {
                ErrorKind::Conflict
            }
            Error::DatabaseLockError | Error::SqlError(_) => ErrorKind::Persistence,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let message = match kind {
            // Storage details are only meant for the server logs.
            ErrorKind::Persistence => {
                tracing::error!("An unexpected error occurred: {self}");
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "kind": kind,
                "message": message,
            }
        }));

        (kind.status_code(), body).into_response()
    }
}
