//! Database setup and the unit of work that every request runs in.

use std::sync::Mutex;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, category::create_category_table, operation::create_operation_table};

/// Create the application tables if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection` first, since SQLite
/// leaves it off by default and it cannot be changed inside a transaction.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_operation_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `work` inside a single database transaction.
///
/// The transaction is committed if `work` succeeds. If `work` returns an error
/// the transaction is dropped, which rolls back every write made so far, and
/// the error is returned unchanged.
///
/// # Errors
/// Returns an [Error::DatabaseLockError] if the connection lock is poisoned,
/// an [Error::SqlError] if the transaction cannot be started or committed, or
/// whatever error `work` returns.
pub fn with_transaction<T>(
    db_connection: &Mutex<Connection>,
    work: impl FnOnce(&Transaction) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.transaction()?;
    let result = work(&transaction)?;
    transaction.commit()?;

    Ok(result)
}
