//! The page for editing an existing transaction.

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
    database_id::TransactionId,
    endpoints::{self, format_endpoint, with_redirect_url},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    transaction::{
        TransactionDraft,
        form::{TransactionFormDefaults, transaction_form_fields},
        get_transaction_draft,
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_transaction_view(transaction: &TransactionDraft, redirect_url: Option<&str>) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let update_url = match redirect_url {
        Some(redirect_url) => with_redirect_url(&update_url, redirect_url),
        None => update_url,
    };
    let fields = transaction_form_fields(&TransactionFormDefaults::from_draft(transaction));

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
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Save Changes"
                }
            }
        }
    };

    base("Edit Transaction", &[], &content)
}

/// Renders the page for editing a transaction owned by the logged in user.
///
/// Stored values that cannot be read are left blank so they can be corrected.
/// Responds with the 404 page if the transaction does not exist or belongs
/// to someone else.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let transaction = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        get_transaction_draft(transaction_id, user_id, &connection)
    };

    let redirect_url = query.redirect_url.as_deref().and_then(normalize_redirect_url);

    match transaction {
        Ok(transaction) => {
            edit_transaction_view(&transaction, redirect_url.as_deref()).into_response()
        }
        Err(Error::NotFound) => Error::NotFound.into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
