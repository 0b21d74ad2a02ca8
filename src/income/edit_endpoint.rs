//! Defines the endpoint for saving changes to an income.
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
    database_id::IncomeId,
    endpoints,
    income::{form::IncomeForm, update_income},
};

#[derive(Debug, Clone)]
pub struct EditIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Overwrite an income owned by the logged in user, then redirect to
/// `redirect_url` or the incomes page.
pub async fn edit_income_endpoint(
    State(state): State<EditIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<IncomeForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_income(income_id, form.into_builder(), user_id, &connection) {
        tracing::warn!("Could not update income {income_id}: {error}");
        return error.into_alert_response();
    }

    let redirect_url = query
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| endpoints::INCOMES_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
