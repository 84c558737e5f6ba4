//! Operation route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::OperationId,
    db::with_transaction,
    operation::{
        Operation, OperationFormData, OperationWithCategory, delete_operation, get_operation,
    },
    period::{PeriodQuery, TypeQuery},
    queries::{add_operation, edit_operation, list_operations, list_operations_by_type},
    timezone::get_local_date,
};

/// The state needed for the operation endpoints.
#[derive(Debug, Clone)]
pub struct OperationState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Used to date operations created without a date and to resolve periods.
    pub local_timezone: String,
}

impl FromRef<AppState> for OperationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler listing the operations of one category type, newest first.
pub async fn list_operations_endpoint(
    State(state): State<OperationState>,
    query: Result<Query<TypeQuery>, QueryRejection>,
) -> Result<Json<Vec<Operation>>, Error> {
    let Query(query) = query?;
    let today = get_local_date(&state.local_timezone);

    with_transaction(&state.db_connection, |connection| {
        list_operations_by_type(query.category_type, query.period, today, connection)
    })
    .map(Json)
}

/// A route handler listing operations of every type with their categories.
pub async fn list_all_operations_endpoint(
    State(state): State<OperationState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Vec<OperationWithCategory>>, Error> {
    let Query(query) = query?;
    let today = get_local_date(&state.local_timezone);

    with_transaction(&state.db_connection, |connection| {
        list_operations(query.period, today, connection)
    })
    .map(Json)
}

/// A route handler for getting a single operation.
pub async fn get_operation_endpoint(
    State(state): State<OperationState>,
    operation_id: Result<Path<OperationId>, PathRejection>,
) -> Result<Json<Operation>, Error> {
    let Path(operation_id) = operation_id?;

    with_transaction(&state.db_connection, |connection| {
        get_operation(operation_id, connection)
    })
    .map(Json)
}

/// A route handler for creating a new operation, responds with the created operation.
pub async fn create_operation_endpoint(
    State(state): State<OperationState>,
    form: Result<Json<OperationFormData>, JsonRejection>,
) -> Result<(StatusCode, Json<Operation>), Error> {
    let Json(form) = form?;
    let today = get_local_date(&state.local_timezone);

    let operation = with_transaction(&state.db_connection, |connection| {
        add_operation(form, today, connection)
    })?;

    tracing::debug!(
        "Created operation {} of {} in category {}",
        operation.id,
        operation.amount,
        operation.category_id
    );

    Ok((StatusCode::CREATED, Json(operation)))
}

/// A route handler for replacing an operation, keeping its date if none is given.
pub async fn update_operation_endpoint(
    State(state): State<OperationState>,
    operation_id: Result<Path<OperationId>, PathRejection>,
    form: Result<Json<OperationFormData>, JsonRejection>,
) -> Result<Json<Operation>, Error> {
    let Path(operation_id) = operation_id?;
    let Json(form) = form?;

    with_transaction(&state.db_connection, |connection| {
        edit_operation(operation_id, form, connection)
    })
    .map(Json)
}

/// A route handler for deleting an operation, responds with no content.
pub async fn delete_operation_endpoint(
    State(state): State<OperationState>,
    operation_id: Result<Path<OperationId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(operation_id) = operation_id?;

    with_transaction(&state.db_connection, |connection| {
        delete_operation(operation_id, connection)
    })?;

    Ok(StatusCode::NO_CONTENT)
}
