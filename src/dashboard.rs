//! The dashboard: a per-user overview of budgets and recent activity.

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
    auth::{UserID, get_user_by_id},
    budget::{Budget, get_budget_spending, get_budgets},
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A budget with its spending total for the overview cards.
#[derive(Debug, Clone)]
struct BudgetSummary {
    budget: Budget,
    spent: f64,
    detail_url: String,
}

/// Display a page with an overview of the user's budgets.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve user {user_id}: {error}"))?;

    let budgets = get_budgets(user_id, &connection)?;
    let summaries = budgets
        .into_iter()
        .map(|budget| {
            let spent = get_budget_spending(budget.id, &connection)?;

            Ok(BudgetSummary {
                detail_url: endpoints::format_endpoint(endpoints::BUDGET_DETAIL_VIEW, budget.id),
                spent,
                budget,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(dashboard_view(&user.display_name, &summaries).into_response())
}

fn dashboard_view(display_name: &str, summaries: &[BudgetSummary]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                h1 class="text-xl font-bold" { "Hello, " (display_name) "!" }

                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-lg font-bold" { "Your Budgets" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                ul class="grid grid-cols-1 sm:grid-cols-2 gap-4"
                {
                    @for summary in summaries {
                        (budget_summary_card(summary))
                    }

                    @if summaries.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400 sm:col-span-2"
                        {
                            "No budgets yet. "
                            a href=(endpoints::NEW_BUDGET_VIEW) class=(LINK_STYLE)
                            {
                                "Create your first budget"
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &content)
}

fn budget_summary_card(summary: &BudgetSummary) -> Markup {
    let remaining = summary.budget.amount - summary.spent;
    let over_budget = remaining < 0.0;

    html!(
        li class=(CARD_STYLE)
        {
            a href=(summary.detail_url) class="font-semibold hover:underline"
            {
                (summary.budget.name)
            }

            p class="mt-1 text-sm text-gray-500 dark:text-gray-400 tabular-nums"
            {
                (format_currency(summary.spent))
                " of "
                (format_currency(summary.budget.amount))
                " / "
                (summary.budget.period)
            }

            @if over_budget {
                p class="mt-1 text-sm font-medium text-red-600 dark:text-red-400 tabular-nums"
                {
                    (format_currency(remaining.abs())) " over budget"
                }
            } @else {
                p class="mt-1 text-sm text-gray-500 dark:text-gray-400 tabular-nums"
                {
                    (format_currency(remaining)) " remaining"
                }
            }
        }
    )
}
