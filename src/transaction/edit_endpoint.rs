//! Defines the endpoint for saving changes to a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    auth::{RedirectQuery, normalize_redirect_url},
    database_id::TransactionId,
    endpoints,
    transaction::{form::TransactionForm, update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Overwrite a transaction owned by the logged in user.
///
/// Redirects to `redirect_url` if it is a local URL, otherwise to the
/// transactions page.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) =
        update_transaction(transaction_id, form.into_builder(), user_id, &connection)
    {
        tracing::warn!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    let redirect_url = query
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
