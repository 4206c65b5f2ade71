//! Database operations for transactions.
//!
//! A transaction has no user column of its own. Ownership flows through the
//! budget, so every scoped query checks the budget's `user_id` via a
//! subquery. A transaction under another user's budget behaves exactly like
//! one that does not exist.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    auth::UserID,
    budget::BudgetId,
    transaction::{
        domain::{Transaction, TransactionId, TransactionKind, TransactionListEntry},
        validation::{NewTransaction, TransactionPatch},
    },
};

/// Initialize the transaction table and indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            budget_id INTEGER NOT NULL REFERENCES budget(id) ON DELETE CASCADE,
            category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_budget ON \"transaction\"(budget_id);",
    )?;

    Ok(())
}

/// Insert a transaction and return it with its generated ID.
///
/// The caller must have verified that the budget belongs to the current user.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (budget_id, category_id, amount, description, date, kind) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            new_transaction.budget_id,
            new_transaction.category_id,
            new_transaction.amount,
            &new_transaction.description,
            new_transaction.date,
            new_transaction.kind.as_str(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        budget_id: new_transaction.budget_id,
        category_id: new_transaction.category_id,
        amount: new_transaction.amount,
        description: new_transaction.description,
        date: new_transaction.date,
        kind: new_transaction.kind,
    })
}

/// Retrieve a single transaction under one of `user_id`'s budgets.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, budget_id, category_id, amount, description, date, kind \
            FROM \"transaction\" \
            WHERE id = :id AND budget_id IN \
                (SELECT id FROM budget WHERE user_id = :user_id);",
        )?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of `user_id`'s transactions with budget and category names,
/// newest first.
pub fn get_transaction_entries(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionListEntry>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.budget_id, t.category_id, t.amount, t.description, t.date, t.kind,
                b.name, c.name, c.icon
            FROM \"transaction\" t
            INNER JOIN budget b ON b.id = t.budget_id
            LEFT JOIN category c ON c.id = t.category_id
            WHERE b.user_id = :user_id
            ORDER BY t.date DESC, t.id DESC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_entry_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a single budget's transactions with category names, newest first.
///
/// The caller must have verified that the budget belongs to the current user.
pub fn get_transaction_entries_for_budget(
    budget_id: BudgetId,
    connection: &Connection,
) -> Result<Vec<TransactionListEntry>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.budget_id, t.category_id, t.amount, t.description, t.date, t.kind,
                b.name, c.name, c.icon
            FROM \"transaction\" t
            INNER JOIN budget b ON b.id = t.budget_id
            LEFT JOIN category c ON c.id = t.category_id
            WHERE t.budget_id = :budget_id
            ORDER BY t.date DESC, t.id DESC;",
        )?
        .query_map(&[(":budget_id", &budget_id)], map_entry_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Apply a partial update to a transaction under one of `user_id`'s budgets.
///
/// An empty patch still runs so that the ownership check is performed, and
/// still bumps `updated_at`. If the patch carries a `budget_id`, the caller
/// must have verified that the target budget belongs to `user_id`.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    patch: TransactionPatch,
    connection: &Connection,
) -> Result<(), Error> {
    let mut assignments = vec!["updated_at = CURRENT_TIMESTAMP".to_owned()];
    let mut params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(budget_id) = patch.budget_id {
        params.push(budget_id.into());
        assignments.push(format!("budget_id = ?{}", params.len()));
    }

    if let Some(category_id) = patch.category_id {
        params.push(match category_id {
            Some(category_id) => category_id.into(),
            None => rusqlite::types::Value::Null,
        });
        assignments.push(format!("category_id = ?{}", params.len()));
    }

    if let Some(amount) = patch.amount {
        params.push(amount.into());
        assignments.push(format!("amount = ?{}", params.len()));
    }

    if let Some(description) = patch.description {
        params.push(description.into());
        assignments.push(format!("description = ?{}", params.len()));
    }

    if let Some(date) = patch.date {
        params.push(rusqlite::types::Value::Text(date.to_string()));
        assignments.push(format!("date = ?{}", params.len()));
    }

    if let Some(kind) = patch.kind {
        params.push(kind.as_str().to_owned().into());
        assignments.push(format!("kind = ?{}", params.len()));
    }

    params.push(transaction_id.into());
    let id_param = params.len();
    params.push(user_id.as_i64().into());
    let user_id_param = params.len();

    let statement = format!(
        "UPDATE \"transaction\" SET {} WHERE id = ?{} AND budget_id IN \
        (SELECT id FROM budget WHERE user_id = ?{})",
        assignments.join(", "),
        id_param,
        user_id_param,
    );

    let rows_affected = connection.execute(&statement, rusqlite::params_from_iter(params))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete a transaction under one of `user_id`'s budgets.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND budget_id IN \
        (SELECT id FROM budget WHERE user_id = ?2)",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let budget_id = row.get(1)?;
    let category_id = row.get(2)?;
    let amount = row.get(3)?;
    let description = row.get(4)?;
    let date = row.get(5)?;
    let raw_kind: String = row.get(6)?;
    let kind = raw_kind.parse::<TransactionKind>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("invalid transaction kind: {raw_kind}").into(),
        )
    })?;

    Ok(Transaction {
        id,
        budget_id,
        category_id,
        amount,
        description,
        date,
        kind,
    })
}

fn map_entry_row(row: &Row) -> Result<TransactionListEntry, rusqlite::Error> {
    Ok(TransactionListEntry {
        transaction: map_row(row)?,
        budget_name: row.get(7)?,
        category_name: row.get(8)?,
        category_icon: row.get(9)?,
    })
}
