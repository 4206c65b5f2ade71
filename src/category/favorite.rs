//! Endpoint for toggling a collection category's favorite flag.

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
        db::{get_category_with_user_state, toggle_favorite},
        domain::CategoryId,
        list::category_card,
    },
};

/// The state needed for toggling a favorite.
#[derive(Debug, Clone)]
pub struct ToggleFavoriteEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleFavoriteEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip the favorite flag and re-render the category card.
pub async fn toggle_favorite_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<ToggleFavoriteEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let is_favorite = match toggle_favorite(user_id, category_id, &connection) {
        Ok(is_favorite) => is_favorite,
        Err(Error::UpdateMissingUserCategory) => {
            return Error::UpdateMissingUserCategory.into_alert_response();
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while toggling favorite on category \
                {category_id}: {error}"
            );
            return error.into_alert_response();
        }
    };

    let message = if is_favorite {
        "Category marked as favorite"
    } else {
        "Category unmarked as favorite"
    };

    match get_category_with_user_state(user_id, category_id, &connection) {
        Ok(entry) => html! {
            (category_card(&entry))
            (Alert::success(message).into_markup())
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
