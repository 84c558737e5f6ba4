//! Category route handlers.

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
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryFormData, CategoryId, CategoryType, delete_category, get_category,
    },
    db::with_transaction,
    queries::{add_category, edit_category, list_categories},
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

/// List every category, or only those of the requested type.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    query: Result<Query<CategoryListQuery>, QueryRejection>,
) -> Result<Json<Vec<Category>>, Error> {
    let Query(query) = query?;

    with_transaction(&state.db_connection, |connection| {
        list_categories(query.category_type, connection)
    })
    .map(Json)
}

/// Get a single category.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Category>, Error> {
    let Path(category_id) = category_id?;

    with_transaction(&state.db_connection, |connection| {
        get_category(category_id, connection)
    })
    .map(Json)
}

/// Create a category, responding with the created category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    form: Result<Json<CategoryFormData>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let Json(form) = form?;

    let category = with_transaction(&state.db_connection, |connection| {
        add_category(form, connection)
    })?;

    tracing::info!("Created category {} ({})", category.id, category.name);

    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category's name and type.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    category_id: Result<Path<CategoryId>, PathRejection>,
    form: Result<Json<CategoryFormData>, JsonRejection>,
) -> Result<Json<Category>, Error> {
    let Path(category_id) = category_id?;
    let Json(form) = form?;

    with_transaction(&state.db_connection, |connection| {
        edit_category(category_id, form, connection)
    })
    .map(Json)
}

/// Delete a category that has no operations.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(category_id) = category_id?;

    with_transaction(&state.db_connection, |connection| {
        delete_category(category_id, connection)
    })?;

    tracing::info!("Deleted category {category_id}");

    Ok(StatusCode::NO_CONTENT)
}
