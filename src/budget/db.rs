//! Database operations for budgets.
//!
//! Every read and write is scoped to the owning user. A budget ID belonging
//! to another user behaves exactly like a budget that does not exist.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    auth::UserID,
    budget::{
        domain::{Budget, BudgetId, BudgetPeriod},
        validation::{BudgetPatch, NewBudget},
    },
};

/// Initialize the budget table and indexes.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            period TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id);",
    )?;

    Ok(())
}

/// Create a budget for `user_id` and return it with its generated ID.
pub fn create_budget(
    user_id: UserID,
    new_budget: NewBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection.execute(
        "INSERT INTO budget (user_id, name, amount, period) VALUES (?1, ?2, ?3, ?4);",
        (
            user_id.as_i64(),
            &new_budget.name,
            new_budget.amount,
            new_budget.period.as_str(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Budget {
        id,
        user_id,
        name: new_budget.name,
        amount: new_budget.amount,
        period: new_budget.period,
    })
}

/// Retrieve a single budget owned by `user_id`.
pub fn get_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, amount, period FROM budget \
            WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &budget_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all budgets owned by `user_id`, ordered alphabetically by name.
pub fn get_budgets(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, amount, period FROM budget \
            WHERE user_id = :user_id ORDER BY name ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Apply a partial update to a budget owned by `user_id`.
///
/// An empty patch still runs so that the ownership check is performed, and
/// still bumps `updated_at`.
pub fn update_budget(
    budget_id: BudgetId,
    user_id: UserID,
    patch: BudgetPatch,
    connection: &Connection,
) -> Result<(), Error> {
    let mut assignments = vec!["updated_at = CURRENT_TIMESTAMP".to_owned()];
    let mut params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(name) = patch.name {
        params.push(name.into());
        assignments.push(format!("name = ?{}", params.len()));
    }

    if let Some(amount) = patch.amount {
        params.push(amount.into());
        assignments.push(format!("amount = ?{}", params.len()));
    }

    if let Some(period) = patch.period {
        params.push(period.as_str().to_owned().into());
        assignments.push(format!("period = ?{}", params.len()));
    }

    params.push(budget_id.into());
    let id_param = params.len();
    params.push(user_id.as_i64().into());
    let user_id_param = params.len();

    let statement = format!(
        "UPDATE budget SET {} WHERE id = ?{} AND user_id = ?{}",
        assignments.join(", "),
        id_param,
        user_id_param,
    );

    let rows_affected = connection.execute(&statement, rusqlite::params_from_iter(params))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Delete a budget owned by `user_id` along with its transactions.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// The total amount spent against a budget (sum of its expense transactions).
pub fn get_budget_spending(budget_id: BudgetId, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" \
            WHERE budget_id = ?1 AND kind = 'expense';",
            [budget_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_user_id: i64 = row.get(1)?;
    let name = row.get(2)?;
    let amount = row.get(3)?;
    let raw_period: String = row.get(4)?;
    let period = raw_period.parse::<BudgetPeriod>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("invalid budget period: {raw_period}").into(),
        )
    })?;

    Ok(Budget {
        id,
        user_id: UserID::new(raw_user_id),
        name,
        amount,
        period,
    })
}
