//! Categories that operations are classified into.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_category, create_category_table, delete_category, get_all_categories,
    get_categories_by_type, get_category, update_category,
};
pub use domain::{Category, CategoryFormData, CategoryId, CategoryName, CategoryType};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_category_endpoint,
    list_categories_endpoint, update_category_endpoint,
};

pub(crate) use db::map_category_row_with_offset;

#[cfg(test)]
pub use db::count_category_operations;
