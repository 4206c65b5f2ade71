//! Database initialization.
//!
//! Each feature module owns its table definitions. This module wires them
//! together so that a fresh database gets the full schema and the default
//! category catalog in one transaction.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    auth::create_user_table,
    budget::create_budget_table,
    category::{create_category_tables, seed_default_categories},
    transaction::create_transaction_table,
};

/// Create the application tables and seed the category catalog.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if the schema cannot be created or there is some other
/// SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_category_tables(&transaction)?;
    create_transaction_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_schema_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
                AND name IN ('user', 'budget', 'category', 'user_category', 'transaction')",
                (),
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 5);
    }

    #[test]
    fn is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }

    #[test]
    fn seeds_default_categories_once() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();

        let category_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM category", (), |row| row.get(0))
            .unwrap();
        assert_eq!(category_count, 10);
    }

    #[test]
    fn enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        let foreign_keys: i64 = conn
            .query_row("PRAGMA foreign_keys", (), |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }
}
