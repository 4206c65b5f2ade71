//! Budgets listing page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::{Budget, get_budget_spending, get_budgets},
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links,
        format_currency},
    navigation::NavBar,
};

/// The state needed for the budgets listing page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A budget with its spending total and formatted URLs for rendering.
#[derive(Debug, Clone)]
struct BudgetCard {
    budget: Budget,
    spent: f64,
    detail_url: String,
    edit_url: String,
    delete_url: String,
}

/// Render the budgets listing page with spending progress per budget.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_budgets(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve budgets: {error}"))?;

    let cards = budgets
        .into_iter()
        .map(|budget| {
            let spent = get_budget_spending(budget.id, &connection)?;

            Ok(BudgetCard {
                detail_url: endpoints::format_endpoint(endpoints::BUDGET_DETAIL_VIEW, budget.id),
                edit_url: endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id),
                delete_url: endpoints::format_endpoint(endpoints::DELETE_BUDGET, budget.id),
                spent,
                budget,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(budgets_view(&cards).into_response())
}

fn budgets_view(cards: &[BudgetCard]) -> Markup {
    let new_budget_route = endpoints::NEW_BUDGET_VIEW;
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Budgets" }

                    a href=(new_budget_route) class=(LINK_STYLE)
                    {
                        "Create Budget"
                    }
                }

                ul class="space-y-4"
                {
                    @for card in cards {
                        (budget_card_view(card))
                    }

                    @if cards.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                        {
                            "No budgets created yet. "
                            a href=(new_budget_route) class=(LINK_STYLE)
                            {
                                "Create your first budget"
                            }
                        }
                    }
                }
            }
        }
    );

    base("Budgets", &content)
}

fn budget_card_view(card: &BudgetCard) -> Markup {
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? This will also delete its transactions.",
        card.budget.name
    );

    html!(
        li class=(CARD_STYLE)
        {
            div class="flex items-start justify-between gap-3"
            {
                a href=(card.detail_url) class="font-semibold hover:underline"
                {
                    (card.budget.name)
                }

                span class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_currency(card.budget.amount)) " / " (card.budget.period)
                }
            }

            (spending_progress_bar(card.spent, card.budget.amount))

            div class="mt-2 flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(
                    &card.edit_url,
                    &card.delete_url,
                    &confirm_message,
                ))
            }
        }
    )
}

/// A bar showing how much of the budget has been spent. Turns red once the
/// budget is exceeded.
fn spending_progress_bar(spent: f64, amount: f64) -> Markup {
    let fraction = if amount > 0.0 { spent / amount } else { 0.0 };
    let percent = (fraction * 100.0).clamp(0.0, 100.0);
    let bar_color = if fraction > 1.0 {
        "bg-red-600"
    } else {
        "bg-blue-600"
    };

    html!(
        div class="mt-2"
        {
            div class="flex justify-between text-sm mb-1"
            {
                span { (format_currency(spent)) " spent" }
                span { (format_currency(amount)) }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700"
            {
                div
                    class={ (bar_color) " h-2.5 rounded-full" }
                    style={ "width: " (percent) "%" }
                {}
            }
        }
    )
}
