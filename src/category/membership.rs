//! Endpoints for adding and removing categories from a user's collection.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    category::{
        db::{add_user_category, get_category_with_user_state, remove_user_category},
        domain::CategoryId,
        list::category_card,
    },
};

/// The state needed for collection membership changes.
#[derive(Debug, Clone)]
pub struct UserCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Add a catalog category to the user's collection and re-render its card.
pub async fn add_user_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UserCategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match add_user_category(user_id, category_id, &connection) {
        Ok(_) => {}
        Err(error @ (Error::DuplicateUserCategory | Error::NotFound)) => {
            return error.into_alert_response();
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while adding category {category_id}: {error}"
            );
            return error.into_alert_response();
        }
    }

    match get_category_with_user_state(user_id, category_id, &connection) {
        Ok(entry) => html! {
            (category_card(&entry))
            (Alert::success("Category added to your collection").into_markup())
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Remove a category from the user's collection and re-render its card.
pub async fn remove_user_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UserCategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match remove_user_category(user_id, category_id, &connection) {
        Ok(_) => {}
        Err(Error::DeleteMissingUserCategory) => {
            return Error::DeleteMissingUserCategory.into_alert_response();
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while removing category {category_id}: {error}"
            );
            return error.into_alert_response();
        }
    }

    match get_category_with_user_state(user_id, category_id, &connection) {
        Ok(entry) => html! {
            (category_card(&entry))
            (Alert::success("Category removed from your collection").into_markup())
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod user_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        category::db::{add_user_category, get_categories_with_user_state,
            get_category_with_user_state},
        test_utils::{assert_valid_html, init_test_db_with_two_users, parse_html_fragment},
    };

    use super::{
        UserCategoryEndpointState, add_user_category_endpoint, remove_user_category_endpoint,
    };

    #[tokio::test]
    async fn add_endpoint_re_renders_card_in_collection_state() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        let state = UserCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            add_user_category_endpoint(Path(category_id), State(state.clone()), Extension(user_id))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("Remove from collection"));
        assert!(html.html().contains("Category added to your collection"));

        let entry = get_category_with_user_state(
            user_id,
            category_id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert!(entry.in_collection);
    }

    #[tokio::test]
    async fn add_endpoint_rejects_duplicate_membership() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        add_user_category(user_id, category_id, &connection).unwrap();
        let state = UserCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            add_user_category_endpoint(Path(category_id), State(state), Extension(user_id))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_endpoint_rejects_unknown_category() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let state = UserCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = add_user_category_endpoint(Path(999), State(state), Extension(user_id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn remove_endpoint_re_renders_card_out_of_collection() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        add_user_category(user_id, category_id, &connection).unwrap();
        let state = UserCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = remove_user_category_endpoint(
            Path(category_id),
            State(state.clone()),
            Extension(user_id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Add to collection"));

        let entry = get_category_with_user_state(
            user_id,
            category_id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert!(!entry.in_collection);
    }

    #[tokio::test]
    async fn remove_endpoint_fails_when_not_in_collection() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        let state = UserCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            remove_user_category_endpoint(Path(category_id), State(state), Extension(user_id))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
