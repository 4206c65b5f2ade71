//! Database operations for the category catalog and per-user collections.
//!
//! Categories are global rows shared by every user. Membership and the
//! favorite flag live in the `user_category` join table, so writes here never
//! touch another user's state.

use rusqlite::{Connection, Row, ffi};

use crate::{
    Error,
    auth::UserID,
    category::domain::{Category, CategoryId, CategoryWithUserState},
};

/// The categories every fresh database starts with.
const DEFAULT_CATEGORIES: [(&str, &str, &str); 10] = [
    ("Groceries", "🛒", "#22c55e"),
    ("Dining Out", "🍽️", "#f97316"),
    ("Transport", "🚗", "#3b82f6"),
    ("Entertainment", "🎬", "#a855f7"),
    ("Utilities", "💡", "#eab308"),
    ("Rent", "🏠", "#ef4444"),
    ("Health", "⚕️", "#14b8a6"),
    ("Salary", "💰", "#10b981"),
    ("Shopping", "🛍️", "#ec4899"),
    ("Travel", "✈️", "#06b6d4"),
];

/// Initialize the category catalog and per-user collection tables.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL,
            color TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_category (
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, category_id)
        );",
    )?;

    Ok(())
}

/// Insert the default catalog. Categories that already exist are left alone.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection
        .prepare("INSERT OR IGNORE INTO category (name, icon, color) VALUES (?1, ?2, ?3);")?;

    for (name, icon, color) in DEFAULT_CATEGORIES {
        statement.execute((name, icon, color))?;
    }

    Ok(())
}

/// Retrieve a single catalog category.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, icon, color FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve the full catalog annotated with `user_id`'s collection state.
///
/// Favorites sort first, then collection members, then the rest, each group
/// alphabetically.
pub fn get_categories_with_user_state(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryWithUserState>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.icon, c.color,
                uc.category_id IS NOT NULL,
                COALESCE(uc.is_favorite, 0)
            FROM category c
            LEFT JOIN user_category uc
                ON uc.category_id = c.id AND uc.user_id = :user_id
            ORDER BY COALESCE(uc.is_favorite, 0) DESC,
                uc.category_id IS NOT NULL DESC,
                c.name ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_category_state_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a single catalog category annotated with `user_id`'s state.
pub fn get_category_with_user_state(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<CategoryWithUserState, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.icon, c.color,
                uc.category_id IS NOT NULL,
                COALESCE(uc.is_favorite, 0)
            FROM category c
            LEFT JOIN user_category uc
                ON uc.category_id = c.id AND uc.user_id = :user_id
            WHERE c.id = :id;",
        )?
        .query_row(
            &[(":user_id", &user_id.as_i64()), (":id", &category_id)],
            map_category_state_row,
        )
        .map_err(|error| error.into())
}

/// Add a catalog category to `user_id`'s collection.
pub fn add_user_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let result = connection.execute(
        "INSERT INTO user_category (user_id, category_id, is_favorite) VALUES (?1, ?2, 0);",
        (user_id.as_i64(), category_id),
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(error, _))
            if error.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            Err(Error::DuplicateUserCategory)
        }
        Err(rusqlite::Error::SqliteFailure(error, _))
            if error.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            Err(Error::NotFound)
        }
        Err(error) => Err(error.into()),
    }
}

/// Remove a category from `user_id`'s collection. The catalog row and any
/// transactions referencing the category are untouched.
pub fn remove_user_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM user_category WHERE user_id = ?1 AND category_id = ?2;",
        (user_id.as_i64(), category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingUserCategory);
    }

    Ok(())
}

/// Flip the favorite flag on a collection entry and return the new value.
pub fn toggle_favorite(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            "UPDATE user_category SET is_favorite = NOT is_favorite \
            WHERE user_id = ?1 AND category_id = ?2 RETURNING is_favorite;",
            (user_id.as_i64(), category_id),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingUserCategory,
            error => error.into(),
        })
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
    })
}

fn map_category_state_row(row: &Row) -> Result<CategoryWithUserState, rusqlite::Error> {
    Ok(CategoryWithUserState {
        category: Category {
            id: row.get(0)?,
            name: row.get(1)?,
            icon: row.get(2)?,
            color: row.get(3)?,
        },
        in_collection: row.get(4)?,
        is_favorite: row.get(5)?,
    })
}

#[cfg(test)]
mod category_query_tests {
    use crate::{Error, test_utils::init_test_db_with_two_users};

    use super::{
        add_user_category, get_categories_with_user_state, get_category,
        get_category_with_user_state, remove_user_category, toggle_favorite,
    };

    #[test]
    fn get_category_succeeds_for_seeded_catalog() {
        let (connection, _, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(
            crate::auth::UserID::new(1),
            &connection,
        )
        .unwrap();
        let first = &categories[0].category;

        let category = get_category(first.id, &connection).unwrap();

        assert_eq!(&category, first);
    }

    #[test]
    fn get_category_fails_for_unknown_id() {
        let (connection, _, _) = init_test_db_with_two_users();

        let result = get_category(999, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn catalog_starts_outside_every_collection() {
        let (connection, user_id, _) = init_test_db_with_two_users();

        let categories = get_categories_with_user_state(user_id, &connection).unwrap();

        assert_eq!(categories.len(), 10);
        assert!(categories.iter().all(|entry| !entry.in_collection));
        assert!(categories.iter().all(|entry| !entry.is_favorite));
    }

    #[test]
    fn add_user_category_is_scoped_to_one_user() {
        let (connection, user_id, other_user) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;

        add_user_category(user_id, category_id, &connection).unwrap();

        let mine = get_category_with_user_state(user_id, category_id, &connection).unwrap();
        assert!(mine.in_collection);

        let theirs = get_category_with_user_state(other_user, category_id, &connection).unwrap();
        assert!(!theirs.in_collection);
    }

    #[test]
    fn add_user_category_twice_fails() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        add_user_category(user_id, category_id, &connection).unwrap();

        let result = add_user_category(user_id, category_id, &connection);

        assert_eq!(result, Err(Error::DuplicateUserCategory));
    }

    #[test]
    fn add_user_category_fails_for_unknown_category() {
        let (connection, user_id, _) = init_test_db_with_two_users();

        let result = add_user_category(user_id, 999, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn remove_user_category_succeeds() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        add_user_category(user_id, category_id, &connection).unwrap();

        remove_user_category(user_id, category_id, &connection).unwrap();

        let state = get_category_with_user_state(user_id, category_id, &connection).unwrap();
        assert!(!state.in_collection);
    }

    #[test]
    fn remove_user_category_fails_when_not_in_collection() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;

        let result = remove_user_category(user_id, category_id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingUserCategory));
    }

    #[test]
    fn remove_keeps_catalog_row() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        add_user_category(user_id, category_id, &connection).unwrap();

        remove_user_category(user_id, category_id, &connection).unwrap();

        assert!(get_category(category_id, &connection).is_ok());
    }

    #[test]
    fn toggle_favorite_flips_flag_both_ways() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;
        add_user_category(user_id, category_id, &connection).unwrap();

        assert_eq!(toggle_favorite(user_id, category_id, &connection), Ok(true));
        assert_eq!(
            toggle_favorite(user_id, category_id, &connection),
            Ok(false)
        );
    }

    #[test]
    fn toggle_favorite_fails_outside_collection() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        let category_id = categories[0].category.id;

        let result = toggle_favorite(user_id, category_id, &connection);

        assert_eq!(result, Err(Error::UpdateMissingUserCategory));
    }

    #[test]
    fn favorites_sort_before_the_rest() {
        let (connection, user_id, _) = init_test_db_with_two_users();
        let categories = get_categories_with_user_state(user_id, &connection).unwrap();
        // Pick a category late in the alphabet so the sort change is visible.
        let last = categories.last().unwrap().category.clone();
        add_user_category(user_id, last.id, &connection).unwrap();
        toggle_favorite(user_id, last.id, &connection).unwrap();

        let sorted = get_categories_with_user_state(user_id, &connection).unwrap();

        assert_eq!(sorted[0].category.id, last.id);
        assert!(sorted[0].is_favorite);
    }
}
