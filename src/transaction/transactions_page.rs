//! The page listing a user's transactions, and the table shared with the
//! home page and dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    endpoints::{self, format_endpoint, with_redirect_url},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    transaction::{Transaction, get_user_transactions},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn transaction_row(transaction: &Transaction, return_to: Option<&str>) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let edit_url = match return_to {
        Some(return_to) => with_redirect_url(&edit_url, return_to),
        None => edit_url,
    };
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(date) = transaction.date {
                    time datetime=(date) { (date) }
                } @else {
                    span class="text-yellow-700 dark:text-yellow-300" { "No date" }
                }
            }

            th
                scope="row"
                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
            {
                (transaction.title)
            }

            td class=(TABLE_CELL_STYLE) { (transaction.category.label()) }

            td class="px-6 py-4 text-right tabular-nums" { (format_currency(transaction.amount)) }

            td class=(TABLE_CELL_STYLE) { (transaction.description) }

            td class=(TABLE_CELL_STYLE)
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &format!(
                        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
                        transaction.title
                    ),
                ))
            }
        }
    }
}

/// A table of transactions with edit and delete actions.
///
/// `return_to` is where the edit page sends the user after saving, defaulting
/// to the transactions page.
pub fn transaction_table<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    return_to: Option<&str>,
) -> Markup {
    let transactions: Vec<&Transaction> = transactions.into_iter().collect();

    html! {
        div class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
        {
            table
                id="transactionList"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in &transactions {
                        (transaction_row(transaction, return_to))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="6"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No transactions found. Record one "
                                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                                {
                                    "here"
                                }
                                "."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transactions_view(transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                (transaction_table(transactions, None))
            }
        }
    };

    base("Transactions", &[], &content)
}

/// Renders every transaction owned by the logged in user, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_user_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&transactions).into_response())
}
