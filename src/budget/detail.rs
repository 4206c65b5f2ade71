//! Budget detail page: one budget's spending progress and transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::{
        Budget, db::{get_budget, get_budget_spending},
        domain::BudgetId,
    },
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    transaction::{TransactionListEntry, get_transaction_entries_for_budget, transaction_row},
};

/// The state needed for the budget detail page.
#[derive(Debug, Clone)]
pub struct BudgetDetailPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render one budget with its transactions, newest first.
///
/// A budget belonging to another user renders the 404 page.
pub async fn get_budget_detail_page(
    Path(budget_id): Path<BudgetId>,
    State(state): State<BudgetDetailPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = get_budget(budget_id, user_id, &connection)?;
    let spent = get_budget_spending(budget_id, &connection)?;
    let entries = get_transaction_entries_for_budget(budget_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    Ok(budget_detail_view(&budget, spent, &entries).into_response())
}

fn budget_detail_view(budget: &Budget, spent: f64, entries: &[TransactionListEntry]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);
    let new_transaction_url = format!(
        "{}?budget_id={}",
        endpoints::NEW_TRANSACTION_VIEW,
        budget.id
    );
    let remaining = budget.amount - spent;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (budget.name) }

                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                }

                dl class="grid grid-cols-3 gap-4 text-center"
                {
                    div
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { "Budget" }
                        dd class="font-semibold tabular-nums"
                        {
                            (format_currency(budget.amount)) " / " (budget.period)
                        }
                    }

                    div
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { "Spent" }
                        dd class="font-semibold tabular-nums" { (format_currency(spent)) }
                    }

                    div
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { "Remaining" }
                        dd class=(remaining_style(remaining)) { (format_currency(remaining)) }
                    }
                }

                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-lg font-bold" { "Transactions" }

                    a href=(new_transaction_url) class=(LINK_STYLE) { "Add Transaction" }
                }

                ul class="space-y-4"
                {
                    @for entry in entries {
                        (transaction_row(entry))
                    }

                    @if entries.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                        {
                            "No transactions recorded against this budget yet. "
                            a href=(new_transaction_url) class=(LINK_STYLE)
                            {
                                "Add one"
                            }
                        }
                    }
                }
            }
        }
    );

    base(&budget.name, &content)
}

fn remaining_style(remaining: f64) -> &'static str {
    if remaining < 0.0 {
        "font-semibold tabular-nums text-red-600 dark:text-red-400"
    } else {
        "font-semibold tabular-nums"
    }
}
