//! Expenses: the model, its storage and the pages for managing them.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionDraft, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transaction_draft,
    get_user_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use transactions_page::{get_transactions_page, transaction_table};
