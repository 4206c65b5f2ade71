//! Categories page: the shared catalog with per-user collection state.

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
    category::{db::get_categories_with_user_state, domain::CategoryWithUserState},
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the categories page.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_categories_with_user_state(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

fn categories_view(categories: &[CategoryWithUserState]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Add categories to your collection and star the ones you use most."
                }

                ul class="grid grid-cols-1 sm:grid-cols-2 gap-4"
                {
                    @for entry in categories {
                        (category_card(entry))
                    }
                }
            }
        }
    );

    base("Categories", &content)
}

/// A single category card.
///
/// Carries its own element ID so the membership and favorite endpoints can
/// swap the card in place.
pub(super) fn category_card(entry: &CategoryWithUserState) -> Markup {
    let card_id = format!("category-{}", entry.category.id);
    let card_target = format!("#{card_id}");

    let add_url = endpoints::format_endpoint(endpoints::ADD_USER_CATEGORY, entry.category.id);
    let remove_url = endpoints::format_endpoint(endpoints::REMOVE_USER_CATEGORY, entry.category.id);
    let favorite_url =
        endpoints::format_endpoint(endpoints::TOGGLE_FAVORITE_CATEGORY, entry.category.id);

    let star_label = if entry.is_favorite {
        "Unfavorite"
    } else {
        "Favorite"
    };
    let star = if entry.is_favorite { "★" } else { "☆" };

    html!(
        li id=(card_id) class=(CARD_STYLE)
        {
            div class="flex items-center justify-between gap-3"
            {
                div class="flex items-center gap-2"
                {
                    span
                        class="flex h-8 w-8 items-center justify-center rounded-full text-lg"
                        style={ "background-color: " (entry.category.color) "33" }
                    {
                        (entry.category.icon)
                    }

                    span class="font-medium" { (entry.category.name) }
                }

                @if entry.in_collection {
                    button
                        type="button"
                        class="text-xl text-yellow-500 hover:text-yellow-400"
                        aria-label=(star_label)
                        hx-post=(favorite_url)
                        hx-target=(card_target)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        (star)
                    }
                }
            }

            div class="mt-2 flex items-center gap-4 text-sm"
            {
                @if entry.in_collection {
                    button
                        type="button"
                        class="text-red-600 hover:text-red-500 dark:text-red-500 dark:hover:text-red-400 underline bg-transparent border-none cursor-pointer"
                        hx-delete=(remove_url)
                        hx-target=(card_target)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Remove from collection"
                    }
                } @else {
                    button
                        type="button"
                        class=(LINK_STYLE)
                        hx-post=(add_url)
                        hx-target=(card_target)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Add to collection"
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod categories_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        category::db::{add_user_category, get_categories_with_user_state},
        test_utils::{assert_valid_html, init_test_db_with_two_users, parse_html_document},
    };

    use super::{CategoriesPageState, get_categories_page};

    #[tokio::test]
    async fn renders_a_card_per_catalog_category() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let state = CategoriesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_categories_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let selector = Selector::parse("li[id^=category-]").unwrap();
        assert_eq!(html.select(&selector).count(), 10);
    }

    #[tokio::test]
    async fn collection_members_show_remove_and_favorite_controls() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        add_user_category(user_id, categories[0].category.id, &connection).unwrap();
        let state = CategoriesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_categories_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.html();
        assert!(text.contains("Remove from collection"));
        assert!(text.contains("Add to collection"));
    }
}
