//! The answers served at the API boundary, composed from the period resolver,
//! the stores and the aggregation functions.
//!
//! Each function takes the connection of the caller's unit of work (see
//! [crate::db::with_transaction]) and expects input that has already been
//! parsed into typed values.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    analytics::{CategoryTotal, Totals, group_by_category, totals},
    category::{
        Category, CategoryFormData, CategoryId, CategoryName, CategoryType, create_category,
        get_all_categories, get_categories_by_type, get_category, update_category,
    },
    database_id::OperationId,
    operation::{
        Operation, OperationFormData, OperationWithCategory, create_operation, get_operation,
        get_operations_by_type, get_operations_with_category, update_operation,
    },
    period::{Period, start_date},
};

/// Income and expense totals for the period ending `today`.
pub fn summary(
    period: Option<Period>,
    today: Date,
    connection: &Connection,
) -> Result<Totals, Error> {
    totals(start_date(period, today), connection)
}

/// Per-category totals of one type for the period ending `today`.
pub fn category_breakdown(
    category_type: CategoryType,
    period: Option<Period>,
    today: Date,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    group_by_category(category_type, start_date(period, today), connection)
}

/// Operations of one category type in the period ending `today`.
///
/// # Errors
/// Returns an [Error::NoOperationsFound] if no operation matches. Unlike the
/// analytics sums, an empty listing is reported as an error.
pub fn list_operations_by_type(
    category_type: CategoryType,
    period: Option<Period>,
    today: Date,
    connection: &Connection,
) -> Result<Vec<Operation>, Error> {
    let operations =
        get_operations_by_type(category_type, start_date(period, today), connection)?;

    if operations.is_empty() {
        return Err(Error::NoOperationsFound);
    }

    Ok(operations)
}

/// Operations in the period ending `today`, each with its category.
///
/// # Errors
/// Returns an [Error::NoOperationsFound] if no operation matches.
pub fn list_operations(
    period: Option<Period>,
    today: Date,
    connection: &Connection,
) -> Result<Vec<OperationWithCategory>, Error> {
    let operations = get_operations_with_category(start_date(period, today), connection)?;

    if operations.is_empty() {
        return Err(Error::NoOperationsFound);
    }

    Ok(operations)
}

/// All categories, or only those of `category_type` when given.
///
/// # Errors
/// Returns an [Error::NoCategoriesFound] if there are no matching categories.
pub fn list_categories(
    category_type: Option<CategoryType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let categories = match category_type {
        Some(category_type) => get_categories_by_type(category_type, connection)?,
        None => get_all_categories(connection)?,
    };

    if categories.is_empty() {
        return Err(Error::NoCategoriesFound);
    }

    Ok(categories)
}

/// Create a category from a request body, lowercasing its name.
pub fn add_category(form: CategoryFormData, connection: &Connection) -> Result<Category, Error> {
    let name = CategoryName::new(&form.name)?;

    create_category(name, form.category_type, connection)
}

/// Replace a category's name and type from a request body.
///
/// # Errors
/// Returns an [Error::CategoryNotFound] if the category does not exist, before
/// the new name is checked against existing categories.
pub fn edit_category(
    category_id: CategoryId,
    form: CategoryFormData,
    connection: &Connection,
) -> Result<Category, Error> {
    get_category(category_id, connection)?;
    let name = CategoryName::new(&form.name)?;

    update_category(category_id, name, form.category_type, connection)
}

/// Create an operation from a request body, dating it `today` if no date was given.
pub fn add_operation(
    form: OperationFormData,
    today: Date,
    connection: &Connection,
) -> Result<Operation, Error> {
    let builder = form.into_builder(today)?;

    create_operation(builder, connection)
}

/// Replace an operation's fields from a request body.
///
/// If no date is given the operation keeps its current date.
///
/// # Errors
/// Returns an [Error::OperationNotFound] if the operation does not exist, or an
/// [Error::CategoryNotFound] if the new category does not exist.
pub fn edit_operation(
    operation_id: OperationId,
    form: OperationFormData,
    connection: &Connection,
) -> Result<Operation, Error> {
    let existing = get_operation(operation_id, connection)?;
    let builder = form.into_builder(existing.created_at)?;

    update_operation(operation_id, builder, connection)
}
