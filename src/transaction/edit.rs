//! Transaction editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    budget::{Budget, get_budget},
    category::{CategoryWithUserState, get_category},
    endpoints,
    forms::FieldErrors,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{
        create::{budget_select, form_context, transaction_form_fields},
        domain::{Transaction, TransactionFormData, TransactionId},
        get_transaction, update_transaction,
        validation::{
            INVALID_BUDGET_MSG, INVALID_CATEGORY_MSG, TransactionPatchFormData,
            validate_transaction_patch,
        },
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction editing page.
///
/// A transaction under another user's budget renders the 404 page.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user_id, &connection)?;
    let (budgets, categories) = form_context(user_id, &connection)?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let form = edit_transaction_form(
        transaction_id,
        &budgets,
        &categories,
        &form_data_from(&transaction),
        &FieldErrors::default(),
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold self-start mb-4" { "Edit Transaction" }
            (form)
        }
    };

    Ok(base("Edit Transaction", &content).into_response())
}

/// Handle transaction update form submission.
///
/// A successful update re-renders the form with the saved values and shows a
/// success alert. Invalid input re-renders with the messages inline.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<TransactionPatchFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let render_form = |errors: &FieldErrors, form_data: &TransactionFormData| -> Response {
        match form_context(user_id, &connection) {
            Ok((budgets, categories)) => {
                edit_transaction_form(transaction_id, &budgets, &categories, form_data, errors)
                    .into_response()
            }
            Err(error) => error.into_alert_response(),
        }
    };

    let patch = match validate_transaction_patch(&form_data) {
        Ok(patch) => patch,
        Err(errors) => return render_form(&errors, &form_data_from_patch(&form_data)),
    };

    // Moving a transaction requires the target budget to belong to the caller.
    if let Some(budget_id) = patch.budget_id {
        if let Err(error) = get_budget(budget_id, user_id, &connection) {
            let mut errors = FieldErrors::default();

            match error {
                Error::NotFound => errors.add("budget_id", INVALID_BUDGET_MSG),
                error => {
                    tracing::error!("Failed to check budget ownership: {error}");
                    return error.into_alert_response();
                }
            }

            return render_form(&errors, &form_data_from_patch(&form_data));
        }
    }

    if let Some(Some(category_id)) = patch.category_id {
        if let Err(error) = get_category(category_id, &connection) {
            let mut errors = FieldErrors::default();

            match error {
                Error::NotFound => errors.add("category_id", INVALID_CATEGORY_MSG),
                error => {
                    tracing::error!("Failed to check category: {error}");
                    return error.into_alert_response();
                }
            }

            return render_form(&errors, &form_data_from_patch(&form_data));
        }
    }

    if let Err(error) = update_transaction(transaction_id, user_id, patch, &connection) {
        if !matches!(error, Error::UpdateMissingTransaction) {
            tracing::error!(
                "An unexpected error occurred while updating transaction \
                {transaction_id}: {error}"
            );
        }

        return error.into_alert_response();
    }

    match get_transaction(transaction_id, user_id, &connection) {
        Ok(transaction) => {
            let form_data = form_data_from(&transaction);

            match form_context(user_id, &connection) {
                Ok((budgets, categories)) => html! {
                    (edit_transaction_form(
                        transaction_id,
                        &budgets,
                        &categories,
                        &form_data,
                        &FieldErrors::default(),
                    ))
                    (Alert::success("Transaction updated").into_markup())
                }
                .into_response(),
                Err(error) => error.into_alert_response(),
            }
        }
        Err(error) => error.into_alert_response(),
    }
}

fn form_data_from(transaction: &Transaction) -> TransactionFormData {
    TransactionFormData {
        budget_id: transaction.budget_id.to_string(),
        category_id: transaction
            .category_id
            .map(|category_id| category_id.to_string()),
        amount: transaction.amount.to_string(),
        description: transaction.description.clone(),
        date: transaction.date.to_string(),
        kind: transaction.kind.to_string(),
    }
}

fn form_data_from_patch(form_data: &TransactionPatchFormData) -> TransactionFormData {
    TransactionFormData {
        budget_id: form_data.budget_id.clone().unwrap_or_default(),
        category_id: form_data.category_id.clone(),
        amount: form_data.amount.clone().unwrap_or_default(),
        description: form_data.description.clone().unwrap_or_default(),
        date: form_data.date.clone().unwrap_or_default(),
        kind: form_data.kind.clone().unwrap_or_default(),
    }
}

fn edit_transaction_form(
    transaction_id: TransactionId,
    budgets: &[Budget],
    categories: &[CategoryWithUserState],
    form_data: &TransactionFormData,
    errors: &FieldErrors,
) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_TRANSACTION, transaction_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (budget_select(budgets, form_data, errors))

            (transaction_form_fields(categories, form_data, errors))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Transaction" }
        }
    }
}
