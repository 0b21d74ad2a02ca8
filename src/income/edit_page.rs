//! The page for editing an existing income.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    auth::{RedirectQuery, normalize_redirect_url},
    database_id::IncomeId,
    endpoints::{self, format_endpoint, with_redirect_url},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    income::{
        IncomeDraft,
        form::{IncomeFormDefaults, income_form_fields},
        get_income_draft,
    },
    navigation::NavBar,
};

#[derive(Debug, Clone)]
pub struct EditIncomePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_income_view(income: &IncomeDraft, redirect_url: Option<&str>) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();
    let update_url = format_endpoint(endpoints::INCOME, income.id);
    let update_url = match redirect_url {
        Some(redirect_url) => with_redirect_url(&update_url, redirect_url),
        None => update_url,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Income" }

                (income_form_fields(&IncomeFormDefaults::from_draft(income)))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Save Changes"
                }
            }
        }
    };

    base("Edit Income", &[], &content)
}

/// Renders the page for editing an income owned by the logged in user.
///
/// An amount or date that cannot be read is left blank for the user to fill in.
pub async fn get_edit_income_page(
    State(state): State<EditIncomePageState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let income = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        get_income_draft(income_id, user_id, &connection)
    };

    let redirect_url = query.redirect_url.as_deref().and_then(normalize_redirect_url);

    match income {
        Ok(income) => edit_income_view(&income, redirect_url.as_deref()).into_response(),
        Err(Error::NotFound) => Error::NotFound.into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve income {income_id}: {error}");
            error.into_response()
        }
    }
}
