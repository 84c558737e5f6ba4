//! Defines the core data models and database queries for operations.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryType, map_category_row_with_offset},
    database_id::OperationId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// Whether an operation is an income or an expense is decided by its category,
/// the amount itself is never negative.
///
/// To create a new `Operation`, use [Operation::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The ID of the operation.
    pub id: OperationId,
    /// The amount of money earned or spent in this operation.
    pub amount: f64,
    /// A text description of what the operation was for.
    pub description: Option<String>,
    /// The date the operation happened.
    pub created_at: Date,
    /// The ID of the category the operation belongs to.
    pub category_id: CategoryId,
}

impl Operation {
    /// Create a new operation.
    ///
    /// Shortcut for [OperationBuilder] for discoverability.
    pub fn build(amount: f64, created_at: Date, category_id: CategoryId) -> OperationBuilder {
        OperationBuilder {
            amount,
            created_at,
            description: None,
            category_id,
        }
    }
}

/// An operation together with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationWithCategory {
    #[serde(flatten)]
    pub operation: Operation,
    pub category: Category,
}

/// A builder for creating and replacing [Operation]s.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::operation::{Operation, create_operation};
///
/// let operation = create_operation(
///     Operation::build(45.99, date!(2025-01-15), groceries.id)
///         .description(Some("Weekly shop".to_owned())),
///     &connection,
/// )?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct OperationBuilder {
    /// The amount of money, zero or more.
    pub amount: f64,

    /// The date when the operation occurred.
    pub created_at: Date,

    /// An optional human-readable description.
    pub description: Option<String>,

    /// The category of the operation, e.g. "salary" or "rent".
    pub category_id: CategoryId,
}

impl OperationBuilder {
    /// Set the description for the operation.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Request body for operation creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationFormData {
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to today's date when omitted.
    #[serde(default)]
    pub created_at: Option<Date>,
    pub category_id: CategoryId,
}

impl OperationFormData {
    /// Validate the form and turn it into a builder, using `today` if no date
    /// was given.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if the amount is negative, NaN or infinite.
    pub fn into_builder(self, today: Date) -> Result<OperationBuilder, Error> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        let description = self
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty());

        Ok(
            Operation::build(self.amount, self.created_at.unwrap_or(today), self.category_id)
                .description(description),
        )
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new operation in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if the category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_operation(
    builder: OperationBuilder,
    connection: &Connection,
) -> Result<Operation, Error> {
    let category_id = builder.category_id;

    let operation = connection
        .prepare(
            "INSERT INTO operation (amount, description, created_at, category_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, description, created_at, category_id",
        )?
        .query_row(
            (
                builder.amount,
                builder.description,
                builder.created_at,
                builder.category_id,
            ),
            map_operation_row,
        )
        .map_err(|error| map_foreign_key_error(error, category_id))?;

    tracing::debug!(
        "Created operation {} in category {}",
        operation.id,
        operation.category_id
    );

    Ok(operation)
}

/// Retrieve an operation from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::OperationNotFound] if `id` does not refer to an operation,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_operation(id: OperationId, connection: &Connection) -> Result<Operation, Error> {
    connection
        .prepare(
            "SELECT id, amount, description, created_at, category_id FROM operation WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_operation_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::OperationNotFound(id),
            error => error.into(),
        })
}

/// Replace every field of an existing operation.
///
/// # Errors
/// This function will return a:
/// - [Error::OperationNotFound] if `id` does not refer to an operation,
/// - [Error::CategoryNotFound] if the new category ID does not refer to a category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_operation(
    id: OperationId,
    builder: OperationBuilder,
    connection: &Connection,
) -> Result<Operation, Error> {
    let category_id = builder.category_id;

    connection
        .prepare(
            "UPDATE operation
             SET amount = ?1, description = ?2, created_at = ?3, category_id = ?4
             WHERE id = ?5
             RETURNING id, amount, description, created_at, category_id",
        )?
        .query_row(
            (
                builder.amount,
                builder.description,
                builder.created_at,
                builder.category_id,
                id,
            ),
            map_operation_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::OperationNotFound(id),
            error => map_foreign_key_error(error, category_id),
        })
}

/// Delete an operation by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::OperationNotFound] if `id` does not refer to an operation,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_operation(id: OperationId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM operation WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::OperationNotFound(id));
    }

    tracing::debug!("Deleted operation {id}");

    Ok(())
}

/// Retrieve the operations of one category type dated on or after `start_date`,
/// most recent first.
pub fn get_operations_by_type(
    category_type: CategoryType,
    start_date: Date,
    connection: &Connection,
) -> Result<Vec<Operation>, Error> {
    connection
        .prepare(
            "SELECT o.id, o.amount, o.description, o.created_at, o.category_id
             FROM operation o
             INNER JOIN category c ON c.id = o.category_id
             WHERE c.category_type = :category_type AND o.created_at >= :start_date
             ORDER BY o.created_at DESC, o.id DESC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":category_type": category_type,
                ":start_date": start_date,
            },
            map_operation_row,
        )?
        .map(|maybe_operation| maybe_operation.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the operations dated on or after `start_date` together with their
/// categories, most recent first.
pub fn get_operations_with_category(
    start_date: Date,
    connection: &Connection,
) -> Result<Vec<OperationWithCategory>, Error> {
    connection
        .prepare(
            "SELECT o.id, o.amount, o.description, o.created_at, o.category_id,
                    c.id, c.name, c.category_type
             FROM operation o
             INNER JOIN category c ON c.id = o.category_id
             WHERE o.created_at >= :start_date
             ORDER BY o.created_at DESC, o.id DESC",
        )?
        .query_map(&[(":start_date", &start_date)], |row| {
            let operation = map_operation_row(row)?;
            let category = map_category_row_with_offset(row, 5)?;

            Ok(OperationWithCategory {
                operation,
                category,
            })
        })?
        .map(|maybe_operation| maybe_operation.map_err(|error| error.into()))
        .collect()
}

/// Create the operation table in the database.
///
/// Deleting a category that still has operations is rejected by the foreign
/// key rather than cascading.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_operation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS operation (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_operation_date_category
            ON operation(created_at, category_id);",
    )?;

    Ok(())
}

/// Map a database row to an Operation.
pub fn map_operation_row(row: &Row) -> Result<Operation, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let created_at = row.get(3)?;
    let category_id = row.get(4)?;

    Ok(Operation {
        id,
        amount,
        description,
        created_at,
        category_id,
    })
}

fn map_foreign_key_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        // Code 787 occurs when a FOREIGN KEY constraint failed.
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::CategoryNotFound(category_id),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
