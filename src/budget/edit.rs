//! Budget editing page and endpoint.

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
    budget::{
        create::budget_form_fields,
        domain::{Budget, BudgetFormData, BudgetId},
        get_budget, update_budget,
        validation::{BudgetPatchFormData, validate_budget_patch},
    },
    endpoints,
    forms::FieldErrors,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the edit budget page.
#[derive(Debug, Clone)]
pub struct EditBudgetPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateBudgetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budget editing page.
///
/// A budget belonging to another user renders the 404 page.
pub async fn get_edit_budget_page(
    Path(budget_id): Path<BudgetId>,
    State(state): State<EditBudgetPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = get_budget(budget_id, user_id, &connection)?;

    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let form = edit_budget_form(budget_id, &form_data_from(&budget), &FieldErrors::default());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold self-start mb-4" { "Edit Budget" }
            (form)
        }
    };

    Ok(base("Edit Budget", &content).into_response())
}

/// Handle budget update form submission.
///
/// A successful update re-renders the form with the saved values and shows a
/// success alert. Invalid input re-renders with the messages inline.
pub async fn update_budget_endpoint(
    Path(budget_id): Path<BudgetId>,
    State(state): State<UpdateBudgetEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<BudgetPatchFormData>,
) -> Response {
    let patch = match validate_budget_patch(&form_data) {
        Ok(patch) => patch,
        Err(errors) => {
            return edit_budget_form(budget_id, &form_data_from_patch(&form_data), &errors)
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_budget(budget_id, user_id, patch, &connection) {
        if !matches!(error, Error::UpdateMissingBudget) {
            tracing::error!(
                "An unexpected error occurred while updating budget {budget_id}: {error}"
            );
        }

        return error.into_alert_response();
    }

    match get_budget(budget_id, user_id, &connection) {
        Ok(budget) => html! {
            (edit_budget_form(budget_id, &form_data_from(&budget), &FieldErrors::default()))
            (Alert::success("Budget updated").into_markup())
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn form_data_from(budget: &Budget) -> BudgetFormData {
    BudgetFormData {
        name: budget.name.clone(),
        amount: budget.amount.to_string(),
        period: budget.period.to_string(),
    }
}

fn form_data_from_patch(form_data: &BudgetPatchFormData) -> BudgetFormData {
    BudgetFormData {
        name: form_data.name.clone().unwrap_or_default(),
        amount: form_data.amount.clone().unwrap_or_default(),
        period: form_data.period.clone().unwrap_or_default(),
    }
}

fn edit_budget_form(
    budget_id: BudgetId,
    form_data: &BudgetFormData,
    errors: &FieldErrors,
) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BUDGET, budget_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (budget_form_fields(form_data, errors))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Budget" }
        }
    }
}
