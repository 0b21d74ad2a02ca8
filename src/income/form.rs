//! The form shared by the new and edit income pages.

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    income::{Income, IncomeBuilder, IncomeDraft},
};

/// The values to prefill the income form with.
#[derive(Default)]
pub struct IncomeFormDefaults<'a> {
    pub title: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub source: Option<&'a str>,
}

impl<'a> IncomeFormDefaults<'a> {
    pub fn from_draft(draft: &'a IncomeDraft) -> Self {
        Self {
            title: Some(&draft.title),
            amount: draft.amount,
            date: draft.date,
            source: Some(&draft.source),
        }
    }
}

pub fn income_form_fields(defaults: &IncomeFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| amount.to_string());

    html! {
        div
        {
            label for="title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Salary"
                required
                value=[defaults.title]
                autofocus[defaults.title.is_none()]
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
            label for="date" class=(FORM_LABEL_STYLE) { "Date received" }

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
            label for="source" class=(FORM_LABEL_STYLE) { "Source" }

            input
                name="source"
                id="source"
                type="text"
                placeholder="Employer"
                value=[defaults.source]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The form data for creating or editing an income.
#[derive(Debug, Deserialize)]
pub struct IncomeForm {
    pub title: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub date: Date,
    #[serde(default)]
    pub source: String,
}

impl IncomeForm {
    pub fn into_builder(self) -> IncomeBuilder {
        Income::build(&self.title, self.amount, Some(self.date)).source(&self.source)
    }
}
