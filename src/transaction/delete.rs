//! Transaction deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    transaction::{db::delete_transaction, domain::TransactionId},
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle transaction deletion. Redirects back to the transactions listing on
/// success.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<DeleteTransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(Error::DeleteMissingTransaction) => {
            Error::DeleteMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting transaction \
                {transaction_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        budget::{BudgetPeriod, NewBudget, create_budget},
        endpoints,
        test_utils::{assert_hx_redirect, init_test_db_with_two_users},
        transaction::{
            db::{create_transaction, get_transaction},
            domain::TransactionKind,
            validation::NewTransaction,
        },
    };

    use super::{DeleteTransactionEndpointState, delete_transaction_endpoint};

    fn seed_transaction(
        connection: &rusqlite::Connection,
        user_id: crate::auth::UserID,
    ) -> crate::transaction::Transaction {
        let budget = create_budget(
            user_id,
            NewBudget {
                name: "Groceries".to_string(),
                amount: 500.0,
                period: BudgetPeriod::Monthly,
            },
            connection,
        )
        .unwrap();

        create_transaction(
            NewTransaction {
                budget_id: budget.id,
                category_id: None,
                amount: 42.5,
                description: "Weekly shop".to_string(),
                date: date!(2026 - 08 - 27),
                kind: TransactionKind::Expense,
            },
            connection,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn deletes_transaction_and_redirects() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let transaction = seed_transaction(&connection, user_id);
        let state = DeleteTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(
            Path(transaction.id),
            State(state.clone()),
            Extension(user_id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let result = get_transaction(
            transaction.id,
            user_id,
            &state.db_connection.lock().unwrap(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delete_fails_for_other_users_transaction() {
        let (connection, owner, other_user) = init_test_db_with_two_users();
        let transaction = seed_transaction(&connection, owner);
        let state = DeleteTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(
            Path(transaction.id),
            State(state.clone()),
            Extension(other_user),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let result = get_transaction(
            transaction.id,
            owner,
            &state.db_connection.lock().unwrap(),
        );
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_fails_for_missing_transaction() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let state = DeleteTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(Path(999), State(state), Extension(user_id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
