use rusqlite::Connection;

use crate::{PasswordHash, User, Username, auth::create_user, db::initialize};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user named `username` with a throwaway password hash.
pub(crate) fn create_test_user(username: &str, connection: &Connection) -> User {
    create_user(
        Username::new_unchecked(username),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}
