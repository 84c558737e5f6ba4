//! Period-bounded sums over operations, grouped by category type or category.
//!
//! Every function filters operations by `created_at >= start_date` and reads
//! the operation's type from its category. Sums over no operations are zero.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryType};

/// Income and expense totals over a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub incomes: f64,
    pub expenses: f64,
    /// Incomes minus expenses, negative when more was spent than earned.
    pub cashflow: f64,
}

impl Totals {
    /// Build totals from the two sums, deriving the cashflow.
    pub fn new(incomes: f64, expenses: f64) -> Self {
        Self {
            incomes,
            expenses,
            cashflow: incomes - expenses,
        }
    }
}

/// The total amount of one category over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
}

/// Sum the amounts of operations with a category of `category_type`.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn sum_by_type(
    category_type: CategoryType,
    start_date: Date,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(o.amount), 0.0)
             FROM operation o
             INNER JOIN category c ON c.id = o.category_id
             WHERE c.category_type = :category_type AND o.created_at >= :start_date",
        )?
        .query_row(
            rusqlite::named_params! {
                ":category_type": category_type,
                ":start_date": start_date,
            },
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Sum incomes and expenses and derive the cashflow.
///
/// # Errors
/// Returns an [Error::SqlError] if either query fails.
pub fn totals(start_date: Date, connection: &Connection) -> Result<Totals, Error> {
    let incomes = sum_by_type(CategoryType::Income, start_date, connection)?;
    let expenses = sum_by_type(CategoryType::Expense, start_date, connection)?;

    Ok(Totals::new(incomes, expenses))
}

/// Sum the amounts of operations per category of `category_type`.
///
/// Only categories with at least one matching operation are returned, ordered
/// by category name.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn group_by_category(
    category_type: CategoryType,
    start_date: Date,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.name, totals.total_amount
             FROM category c
             INNER JOIN (
                SELECT o.category_id, SUM(o.amount) AS total_amount
                FROM operation o
                INNER JOIN category oc ON oc.id = o.category_id
                WHERE oc.category_type = :category_type AND o.created_at >= :start_date
                GROUP BY o.category_id
             ) totals ON totals.category_id = c.id
             ORDER BY c.name ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":category_type": category_type,
                ":start_date": start_date,
            },
            |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total_amount: row.get(1)?,
                })
            },
        )?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod aggregation_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        analytics::{CategoryTotal, Totals, group_by_category, sum_by_type, totals},
        category::{Category, CategoryName, CategoryType, create_category},
        db::initialize,
        operation::{Operation, create_operation},
    };

    const TODAY: Date = date!(2025 - 10 - 18);

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_category(
        name: &str,
        category_type: CategoryType,
        conn: &Connection,
    ) -> Category {
        create_category(CategoryName::new_unchecked(name), category_type, conn)
            .expect("Could not create test category")
    }

    fn insert(amount: f64, date: Date, category: &Category, conn: &Connection) {
        create_operation(Operation::build(amount, date, category.id), conn)
            .expect("Could not create test operation");
    }

    #[test]
    fn empty_store_sums_to_zero() {
        let conn = get_test_connection();

        assert_eq!(sum_by_type(CategoryType::Income, TODAY, &conn), Ok(0.0));
        assert_eq!(totals(TODAY, &conn), Ok(Totals::new(0.0, 0.0)));
        assert_eq!(
            totals(TODAY, &conn).unwrap(),
            Totals {
                incomes: 0.0,
                expenses: 0.0,
                cashflow: 0.0
            }
        );
    }

    #[test]
    fn category_without_operations_sums_to_zero() {
        let conn = get_test_connection();
        create_test_category("salary", CategoryType::Income, &conn);

        let got = sum_by_type(CategoryType::Income, TODAY, &conn);

        assert_eq!(got, Ok(0.0));
    }

    #[test]
    fn sums_only_matching_type_on_or_after_start() {
        let conn = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &conn);
        let rent = create_test_category("rent", CategoryType::Expense, &conn);
        insert(100.0, date!(2025 - 10 - 11), &salary, &conn);
        insert(25.0, date!(2025 - 10 - 18), &salary, &conn);
        insert(999.0, date!(2025 - 10 - 10), &salary, &conn);
        insert(40.0, date!(2025 - 10 - 18), &rent, &conn);

        let got = sum_by_type(CategoryType::Income, date!(2025 - 10 - 11), &conn);

        assert_eq!(got, Ok(125.0));
    }

    #[test]
    fn sum_is_independent_of_insertion_order() {
        let amounts = [3.0, 10.0, 0.0, 7.0, 5.0];

        let forward = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &forward);
        for amount in amounts {
            insert(amount, TODAY, &salary, &forward);
        }

        let backward = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &backward);
        for amount in amounts.iter().rev() {
            insert(*amount, TODAY, &salary, &backward);
        }

        assert_eq!(
            sum_by_type(CategoryType::Income, TODAY, &forward),
            sum_by_type(CategoryType::Income, TODAY, &backward)
        );
        assert_eq!(sum_by_type(CategoryType::Income, TODAY, &forward), Ok(25.0));
    }

    #[test]
    fn cashflow_is_incomes_minus_expenses() {
        let conn = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &conn);
        let rent = create_test_category("rent", CategoryType::Expense, &conn);
        insert(100.0, TODAY, &salary, &conn);
        insert(40.0, TODAY, &rent, &conn);

        let got = totals(date!(2025 - 10 - 11), &conn).unwrap();

        assert_eq!(
            got,
            Totals {
                incomes: 100.0,
                expenses: 40.0,
                cashflow: 60.0
            }
        );
    }

    #[test]
    fn cashflow_may_be_negative() {
        let conn = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &conn);
        let rent = create_test_category("rent", CategoryType::Expense, &conn);
        insert(10.0, TODAY, &salary, &conn);
        insert(40.0, TODAY, &rent, &conn);

        let got = totals(TODAY, &conn).unwrap();

        assert_eq!(got.cashflow, -30.0);
        assert_eq!(got.cashflow, got.incomes - got.expenses);
    }

    #[test]
    fn group_by_category_sums_per_category() {
        let conn = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &conn);
        let bonus = create_test_category("bonus", CategoryType::Income, &conn);
        let rent = create_test_category("rent", CategoryType::Expense, &conn);
        insert(100.0, TODAY, &salary, &conn);
        insert(50.0, TODAY, &salary, &conn);
        insert(20.0, TODAY, &bonus, &conn);
        insert(40.0, TODAY, &rent, &conn);

        let got = group_by_category(CategoryType::Income, date!(2025 - 10 - 11), &conn).unwrap();

        assert_eq!(
            got,
            vec![
                CategoryTotal {
                    category: "bonus".to_owned(),
                    total_amount: 20.0
                },
                CategoryTotal {
                    category: "salary".to_owned(),
                    total_amount: 150.0
                },
            ]
        );
    }

    #[test]
    fn group_by_category_omits_categories_without_matching_operations() {
        let conn = get_test_connection();
        let salary = create_test_category("salary", CategoryType::Income, &conn);
        let gifts = create_test_category("gifts", CategoryType::Income, &conn);
        create_test_category("interest", CategoryType::Income, &conn);
        insert(100.0, TODAY, &salary, &conn);
        insert(30.0, date!(2024 - 01 - 01), &gifts, &conn);

        let got = group_by_category(CategoryType::Income, date!(2025 - 10 - 11), &conn).unwrap();

        assert_eq!(
            got,
            vec![CategoryTotal {
                category: "salary".to_owned(),
                total_amount: 100.0
            }]
        );
    }

    #[test]
    fn group_by_category_on_empty_store_is_empty() {
        let conn = get_test_connection();

        let got = group_by_category(CategoryType::Expense, TODAY, &conn);

        assert_eq!(got, Ok(Vec::new()));
    }
}
