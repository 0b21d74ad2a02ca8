//! Money coming in: the income model, its storage and the pages for managing it.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod incomes_page;

pub use core::{
    Income, IncomeBuilder, IncomeDraft, create_income, create_income_table, delete_income,
    get_income, get_income_draft, get_user_incomes, update_income,
};
pub use create_endpoint::create_income_endpoint;
pub use create_page::get_create_income_page;
pub use delete_endpoint::delete_income_endpoint;
pub use edit_endpoint::edit_income_endpoint;
pub use edit_page::get_edit_income_page;
pub use incomes_page::{get_incomes_page, income_table};
