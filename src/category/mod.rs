//! The shared category catalog and per-user category collections.

mod db;
mod domain;
mod favorite;
mod list;
mod membership;

pub use db::{
    add_user_category, create_category_tables, get_categories_with_user_state, get_category,
    get_category_with_user_state, remove_user_category, seed_default_categories, toggle_favorite,
};
pub use domain::{Category, CategoryId, CategoryWithUserState};
pub use favorite::toggle_favorite_endpoint;
pub use list::get_categories_page;
pub use membership::{add_user_category_endpoint, remove_user_category_endpoint};
