//! Budget creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::{
        create_budget,
        domain::{BudgetFormData, BudgetPeriod},
        validation::validate_new_budget,
    },
    endpoints,
    forms::FieldErrors,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        field_error_messages,
    },
    navigation::NavBar,
};

/// The state needed for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the new budget page.
pub async fn get_new_budget_page() -> Response {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let form = new_budget_form(&BudgetFormData::default(), &FieldErrors::default());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold self-start mb-4" { "New Budget" }
            (form)
        }
    };

    base("New Budget", &content).into_response()
}

/// Handle budget creation form submission.
///
/// Invalid input re-renders the form with the validation messages inline.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<BudgetFormData>,
) -> Response {
    let new_budget = match validate_new_budget(&form_data) {
        Ok(new_budget) => new_budget,
        Err(errors) => {
            return new_budget_form(&form_data, &errors).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_budget(user_id, new_budget, &connection) {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a budget: {error}");
            error.into_alert_response()
        }
    }
}

fn new_budget_form(form_data: &BudgetFormData, errors: &FieldErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_BUDGET)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (budget_form_fields(form_data, errors))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Budget" }
        }
    }
}

/// The name, amount, and period fields shared by the create and edit forms.
pub(super) fn budget_form_fields(form_data: &BudgetFormData, errors: &FieldErrors) -> Markup {
    let selected_period = form_data
        .period
        .parse::<BudgetPeriod>()
        .unwrap_or(BudgetPeriod::Monthly);

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="e.g. Groceries"
                value=(form_data.name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error_messages(errors, "name"))
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                id="amount"
                type="number"
                name="amount"
                step="0.01"
                min="0"
                placeholder="0.00"
                value=(form_data.amount)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error_messages(errors, "amount"))
        }

        fieldset
        {
            legend class=(FORM_LABEL_STYLE) { "Period" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for period in BudgetPeriod::all() {
                    div class="flex flex-1 items-center"
                    {
                        input
                            id={ "period-" (period.as_str()) }
                            type="radio"
                            name="period"
                            value=(period.as_str())
                            checked[period == selected_period]
                            class=(FORM_RADIO_INPUT_STYLE)
                            hidden;

                        label
                            for={ "period-" (period.as_str()) }
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (capitalize(period.as_str()))
                        }
                    }
                }
            }

            (field_error_messages(errors, "period"))
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod new_budget_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_new_budget_page;

    #[tokio::test]
    async fn renders_budget_form() {
        let response = get_new_budget_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_BUDGET, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button_with_text(&form, "Create Budget");
    }

    #[tokio::test]
    async fn renders_radio_button_per_period() {
        let response = get_new_budget_page().await;

        let html = parse_html_document(response).await;
        let selector = scraper::Selector::parse("input[type=radio][name=period]").unwrap();
        let values = html
            .select(&selector)
            .map(|input| input.attr("value").unwrap_or_default())
            .collect::<Vec<_>>();

        assert_eq!(values, vec!["monthly", "weekly", "yearly"]);
    }
}

#[cfg(test)]
mod create_budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        budget::{domain::BudgetFormData, get_budgets},
        endpoints,
        test_utils::{
            assert_field_error, assert_hx_redirect, assert_valid_html, init_test_db_with_two_users,
            parse_html_fragment,
        },
    };

    use super::{CreateBudgetEndpointState, create_budget_endpoint};

    #[tokio::test]
    async fn creates_budget_and_redirects() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let state = CreateBudgetEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = BudgetFormData {
            name: "Groceries".to_string(),
            amount: "500".to_string(),
            period: "monthly".to_string(),
        };

        let response = create_budget_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BUDGETS_VIEW);

        let budgets = get_budgets(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].name, "Groceries");
    }

    #[tokio::test]
    async fn invalid_form_re_renders_with_field_errors() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let state = CreateBudgetEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = BudgetFormData {
            name: "".to_string(),
            amount: "not a number".to_string(),
            period: "daily".to_string(),
        };

        let response = create_budget_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_field_error(&html, "name", "Name is required");
        assert_field_error(&html, "amount", "Amount must be a number");
        assert_field_error(&html, "period", "Period must be monthly, weekly, or yearly");

        let budgets = get_budgets(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(budgets.is_empty());
    }

    #[tokio::test]
    async fn does_not_create_budget_for_invalid_amount() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let state = CreateBudgetEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = BudgetFormData {
            name: "Groceries".to_string(),
            amount: "-1".to_string(),
            period: "monthly".to_string(),
        };

        let response = create_budget_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_field_error(&html, "amount", "Amount must be greater than 0");
    }
}
