//! Incomes and expenses, each belonging to a category.

mod core;
mod endpoints;

pub use core::{
    Operation, OperationFormData, OperationWithCategory, create_operation,
    create_operation_table, delete_operation, get_operation, get_operations_by_type,
    get_operations_with_category, update_operation,
};
pub use endpoints::{
    create_operation_endpoint, delete_operation_endpoint, get_operation_endpoint,
    list_all_operations_endpoint, list_operations_endpoint, update_operation_endpoint,
};
