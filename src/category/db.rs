//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, CategoryType},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if a category with the same name and type exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "INSERT INTO category (name, category_type) VALUES (?1, ?2)
             RETURNING id, name, category_type",
        )?
        .query_row((name.as_ref(), category_type), map_category_row)
        .map_err(|error| map_unique_error(error, &name, category_type))?;

    tracing::debug!("Created category {} ({})", category.name, category.category_type);

    Ok(category)
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, category_type FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound(category_id),
            error => error.into(),
        })
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, category_type FROM category ORDER BY name ASC, id ASC;")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the categories of one type ordered alphabetically by name.
pub fn get_categories_by_type(
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, category_type FROM category
             WHERE category_type = :category_type
             ORDER BY name ASC;",
        )?
        .query_map(&[(":category_type", &category_type)], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace a category's name and type.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a category,
/// - [Error::DuplicateCategory] if the new name and type clash with another category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, category_type = ?2 WHERE id = ?3",
            (name.as_ref(), category_type, category_id),
        )
        .map_err(|error| map_unique_error(error, &name, category_type))?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound(category_id));
    }

    Ok(Category {
        id: category_id,
        name,
        category_type,
    })
}

/// Delete a category that no operation refers to.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryHasOperations] if at least one operation refers to the category,
/// - [Error::CategoryNotFound] if `category_id` does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    if count_category_operations(category_id, connection)? > 0 {
        return Err(Error::CategoryHasOperations(category_id));
    }

    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::CategoryHasOperations(category_id),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound(category_id));
    }

    tracing::debug!("Deleted category {category_id}");

    Ok(())
}

/// Count the operations that refer to a category.
pub fn count_category_operations(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM operation WHERE category_id = ?1;",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the category table and indexes.
///
/// Names are unique per category type, so "bonus" may exist as both an income
/// and an expense category.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_type TEXT NOT NULL CHECK (category_type IN ('income', 'expense')),
            UNIQUE (name, category_type)
        );

        CREATE INDEX IF NOT EXISTS idx_category_type ON category(category_type);",
    )?;

    Ok(())
}

/// Map a database row to a Category.
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_category_row_with_offset(row, 0)
}

/// Map a database row to a Category, reading from column `offset` onwards so
/// that a category can be read from the right hand side of a join.
pub(crate) fn map_category_row_with_offset(
    row: &Row,
    offset: usize,
) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let raw_name: String = row.get(offset + 1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let category_type = row.get(offset + 2)?;

    Ok(Category {
        id,
        name,
        category_type,
    })
}

fn map_unique_error(
    error: rusqlite::Error,
    name: &CategoryName,
    category_type: CategoryType,
) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategory {
            name: name.to_string(),
            category_type,
        },
        error => error.into(),
    }
}
