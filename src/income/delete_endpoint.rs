use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, UserID, database_id::IncomeId, income::delete_income};

#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an income owned by the logged in user.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_income(income_id, user_id, &connection) {
        // HTMX only swaps out the row on 200 OK.
        Ok(()) => Html("").into_response(),
        Err(error) => {
            tracing::warn!("Could not delete income {income_id}: {error}");
            error.into_alert_response()
        }
    }
}
