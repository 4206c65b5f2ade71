//! Transactions listing page.

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
    endpoints,
    html::{
        CARD_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    transaction::{db::get_transaction_entries, domain::TransactionListEntry},
};

/// The state needed for the transactions listing page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transactions listing page, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_transaction_entries(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    Ok(transactions_view(&entries).into_response())
}

fn transactions_view(entries: &[TransactionListEntry]) -> Markup {
    let new_transaction_route = endpoints::NEW_TRANSACTION_VIEW;
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(new_transaction_route) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                ul class="space-y-4"
                {
                    @for entry in entries {
                        (transaction_row(entry))
                    }

                    @if entries.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                        {
                            "No transactions recorded yet. "
                            a href=(new_transaction_route) class=(LINK_STYLE)
                            {
                                "Add your first transaction"
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &content)
}

/// One transaction row: amount signed and colored by kind.
pub(crate) fn transaction_row(entry: &TransactionListEntry) -> Markup {
    let edit_url =
        endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, entry.transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, entry.transaction.id);
    let confirm_message = "Are you sure you want to delete this transaction?";

    let is_income = matches!(
        entry.transaction.kind,
        crate::transaction::domain::TransactionKind::Income
    );
    let magnitude = entry.transaction.amount.abs();
    let (amount_style, signed_amount) = if is_income {
        (
            "text-green-600 dark:text-green-400 tabular-nums",
            format!("+{}", format_currency(magnitude)),
        )
    } else {
        (
            "text-red-600 dark:text-red-400 tabular-nums",
            format!("-{}", format_currency(magnitude)),
        )
    };

    html!(
        li class=(CARD_STYLE)
        {
            div class="flex items-start justify-between gap-3"
            {
                div
                {
                    span class="font-medium"
                    {
                        @if entry.transaction.description.is_empty() {
                            (entry.budget_name)
                        } @else {
                            (entry.transaction.description)
                        }
                    }

                    div class="mt-1 flex items-center gap-2 text-sm text-gray-500 dark:text-gray-400"
                    {
                        span { (entry.transaction.date) }
                        span { (entry.budget_name) }

                        @if let Some(category_name) = &entry.category_name {
                            span class=(CATEGORY_BADGE_STYLE)
                            {
                                @if let Some(icon) = &entry.category_icon {
                                    (icon) " "
                                }
                                (category_name)
                            }
                        }
                    }
                }

                span class=(amount_style) { (signed_amount) }
            }

            div class="mt-2 flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(&edit_url, &delete_url, confirm_message))
            }
        }
    )
}
