use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, UserID, create_user},
    db::initialize,
};

/// An in-memory database with the full schema, seeded categories, and two
/// registered users. Most ownership tests need a second user to check
/// cross-user isolation.
pub(crate) fn init_test_db_with_two_users() -> (Connection, UserID, UserID) {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    let password_hash = PasswordHash::new_unchecked(
        "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
    );

    let alice = create_user(
        EmailAddress::from_str("alice@example.com").unwrap(),
        "Alice",
        password_hash.clone(),
        &connection,
    )
    .expect("Could not create test user");

    let bob = create_user(
        EmailAddress::from_str("bob@example.com").unwrap(),
        "Bob",
        password_hash,
        &connection,
    )
    .expect("Could not create test user");

    (connection, alice.id, bob.id)
}
