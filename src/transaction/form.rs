//! The form shared by the new and edit transaction pages.

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    category::Category,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::{Transaction, TransactionBuilder, TransactionDraft},
};

/// The values to prefill the transaction form with.
pub struct TransactionFormDefaults<'a> {
    pub title: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub category: Option<Category>,
    pub description: Option<&'a str>,
    pub autofocus_title: bool,
}

impl<'a> TransactionFormDefaults<'a> {
    /// Defaults for a new transaction dated `today`.
    pub fn new_transaction(today: Date) -> Self {
        Self {
            title: None,
            amount: None,
            date: Some(today),
            category: None,
            description: None,
            autofocus_title: true,
        }
    }

    /// Defaults showing the stored values of `draft`.
    pub fn from_draft(draft: &'a TransactionDraft) -> Self {
        Self {
            title: Some(&draft.title),
            amount: draft.amount,
            date: draft.date,
            category: draft.category,
            description: Some(&draft.description),
            autofocus_title: false,
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| amount.to_string());

    html! {
        div
        {
            label for="title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Weekly groceries"
                required
                value=[defaults.title]
                autofocus[defaults.autofocus_title]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                required
                value=[defaults.date]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in Category::ALL {
                    option
                        value=(category.as_str())
                        selected[defaults.category == Some(category)]
                    {
                        (category.label())
                    }
                }
            }
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// A short name for the transaction.
    pub title: String,
    /// The amount spent in dollars.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// What the money was spent on.
    pub category: Category,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

impl TransactionForm {
    pub fn into_builder(self) -> TransactionBuilder {
        Transaction::build(&self.title, self.amount, Some(self.date), self.category)
            .description(&self.description)
    }
}
