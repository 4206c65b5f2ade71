//! Transaction creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::{Budget, BudgetId, get_budget, get_budgets},
    category::{CategoryWithUserState, get_categories_with_user_state, get_category},
    endpoints,
    forms::FieldErrors,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        field_error_messages,
    },
    navigation::NavBar,
    transaction::{
        create_transaction,
        domain::{TransactionFormData, TransactionKind},
        validation::{INVALID_BUDGET_MSG, INVALID_CATEGORY_MSG, validate_new_transaction},
    },
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for preselecting a budget, used by the budget detail
/// page's "Add Transaction" link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransactionQuery {
    pub budget_id: Option<BudgetId>,
}

/// Render the new transaction page.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<NewTransactionQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_budgets(user_id, &connection)?;
    let categories = get_categories_with_user_state(user_id, &connection)?;

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let body = if budgets.is_empty() {
        html! {
            p
            {
                "You need a budget before you can record transactions. "
                a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE) { "Create a budget" }
            }
        }
    } else {
        let form_data = TransactionFormData {
            budget_id: query
                .budget_id
                .map(|budget_id| budget_id.to_string())
                .unwrap_or_default(),
            kind: TransactionKind::Expense.to_string(),
            ..Default::default()
        };

        new_transaction_form(&budgets, &categories, &form_data, &FieldErrors::default())
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold self-start mb-4" { "New Transaction" }
            (body)
        }
    };

    Ok(base("New Transaction", &content).into_response())
}

/// Handle transaction creation form submission.
///
/// The budget must exist and belong to the current user, and the category, if
/// given, must exist in the catalog. Either failure renders as a field error,
/// the same as malformed input.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let render_form = |errors: &FieldErrors| -> Response {
        match form_context(user_id, &connection) {
            Ok((budgets, categories)) => {
                new_transaction_form(&budgets, &categories, &form_data, errors).into_response()
            }
            Err(error) => error.into_alert_response(),
        }
    };

    let new_transaction = match validate_new_transaction(&form_data) {
        Ok(new_transaction) => new_transaction,
        Err(errors) => return render_form(&errors),
    };

    if let Err(error) = get_budget(new_transaction.budget_id, user_id, &connection) {
        let mut errors = FieldErrors::default();

        match error {
            Error::NotFound => errors.add("budget_id", INVALID_BUDGET_MSG),
            error => {
                tracing::error!("Failed to check budget ownership: {error}");
                return error.into_alert_response();
            }
        }

        return render_form(&errors);
    }

    if let Some(category_id) = new_transaction.category_id {
        if let Err(error) = get_category(category_id, &connection) {
            let mut errors = FieldErrors::default();

            match error {
                Error::NotFound => errors.add("category_id", INVALID_CATEGORY_MSG),
                error => {
                    tracing::error!("Failed to check category: {error}");
                    return error.into_alert_response();
                }
            }

            return render_form(&errors);
        }
    }

    let budget_id = new_transaction.budget_id;

    match create_transaction(new_transaction, &connection) {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::format_endpoint(
                endpoints::BUDGET_DETAIL_VIEW,
                budget_id,
            )),
            (),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");
            error.into_alert_response()
        }
    }
}

pub(super) fn form_context(
    user_id: UserID,
    connection: &Connection,
) -> Result<(Vec<Budget>, Vec<CategoryWithUserState>), Error> {
    Ok((
        get_budgets(user_id, connection)?,
        get_categories_with_user_state(user_id, connection)?,
    ))
}

fn new_transaction_form(
    budgets: &[Budget],
    categories: &[CategoryWithUserState],
    form_data: &TransactionFormData,
    errors: &FieldErrors,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_TRANSACTION)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (budget_select(budgets, form_data, errors))

            (transaction_form_fields(categories, form_data, errors))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Transaction" }
        }
    }
}

/// The budget selector shared by the create and edit forms.
pub(super) fn budget_select(
    budgets: &[Budget],
    form_data: &TransactionFormData,
    errors: &FieldErrors,
) -> Markup {
    html! {
        div
        {
            label for="budget_id" class=(FORM_LABEL_STYLE) { "Budget" }

            select
                id="budget_id"
                name="budget_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for budget in budgets {
                    option
                        value=(budget.id)
                        selected[budget.id.to_string() == form_data.budget_id]
                    {
                        (budget.name)
                    }
                }
            }

            (field_error_messages(errors, "budget_id"))
        }
    }
}

/// The kind, amount, date, category, and description fields shared by the
/// create and edit forms.
pub(super) fn transaction_form_fields(
    categories: &[CategoryWithUserState],
    form_data: &TransactionFormData,
    errors: &FieldErrors,
) -> Markup {
    let selected_kind = form_data
        .kind
        .parse::<TransactionKind>()
        .unwrap_or(TransactionKind::Expense);
    let selected_category = form_data.category_id.clone().unwrap_or_default();

    html! {
        fieldset
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for (kind, label) in [
                    (TransactionKind::Expense, "Expense"),
                    (TransactionKind::Income, "Income"),
                ] {
                    div class="flex flex-1 items-center"
                    {
                        input
                            id={ "kind-" (kind.as_str()) }
                            type="radio"
                            name="kind"
                            value=(kind.as_str())
                            checked[kind == selected_kind]
                            class=(FORM_RADIO_INPUT_STYLE)
                            hidden;

                        label for={ "kind-" (kind.as_str()) } class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (label)
                        }
                    }
                }
            }

            (field_error_messages(errors, "kind"))
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                id="amount"
                type="number"
                name="amount"
                step="0.01"
                placeholder="0.00"
                value=(form_data.amount)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error_messages(errors, "amount"))
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                value=(form_data.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error_messages(errors, "date"))
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

            select
                id="category_id"
                name="category_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="none" { "None" }

                @for entry in categories {
                    option
                        value=(entry.category.id)
                        selected[entry.category.id.to_string() == selected_category]
                    {
                        (entry.category.icon) " " (entry.category.name)
                    }
                }
            }

            (field_error_messages(errors, "category_id"))
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            textarea
                id="description"
                name="description"
                rows="3"
                placeholder="Optional notes"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (form_data.description)
            }

            (field_error_messages(errors, "description"))
        }
    }
}
