//! Shared maud layouts, form fields and formatting helpers.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{
    cashflow::{CashflowSummary, Period, RecordRef},
    endpoints,
};

pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600";

pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";
pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";
pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Extra elements for the `<head>` of a page.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript to inline in a script tag.
    ScriptSource(PreEscaped<String>),
}

/// The page skeleton shared by every full page.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Budget Tracker" }
                link href="/static/main.css" rel="stylesheet";
                script src="/static/htmx.min.js" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::ScriptSource(text) => script { (text) }
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

/// A full page explaining an error, with a link back to the home page.
///
/// `link` is an optional `(label, href)` shown before the home page link.
pub fn error_view(
    title: &str,
    header: &str,
    description: &str,
    fix: &str,
    link: Option<(&str, &str)>,
) -> Markup {
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1 class="mb-4 text-7xl tracking-tight font-extrabold lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p class="mb-4 text-3xl md:text-4xl tracking-tight font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p class="mb-4 text-1xl md:text-2xl tracking-tight text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    @if let Some((label, href)) = link {
                        a
                            href=(href)
                            class="inline-flex text-white bg-blue-600 hover:bg-blue-800 font-medium rounded text-sm px-5 py-2.5 text-center my-4 mr-2"
                        {
                            (label)
                        }
                    }

                    a
                        href=(endpoints::ROOT)
                        class="inline-flex text-white bg-blue-600 hover:bg-blue-800 font-medium rounded text-sm px-5 py-2.5 text-center my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// The card layout used by the log-in and registration pages.
pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            a href=(endpoints::ROOT) class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Budget Tracker"
            }

            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        (form_title)
                    }

                    (form)
                }
            }
        }
    }
}

pub fn username_input(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="username" class=(FORM_LABEL_STYLE) { "Username" }

            input
                type="text"
                name="username"
                id="username"
                autocomplete="username"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(username);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// A password field, `id` and `name` are both set to `name`.
pub fn password_input(name: &str, label: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="password"
                name=(name)
                id=(name)
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

pub fn loading_spinner() -> Markup {
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 24 24"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            circle cx="12" cy="12" r="10" stroke="#E5E7EB" stroke-width="4" {}
            path d="M22 12a10 10 0 0 0-10-10" stroke="currentColor" stroke-width="4" {}
        }
    }
}

fn whole_number_formatter() -> Option<&'static Formatter> {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    FORMATTER
        .get_or_init(|| {
            Formatter::new()
                .separator(',')
                .map(|formatter| formatter.precision(Precision::Decimals(0)))
                .ok()
        })
        .as_ref()
}

fn group_thousands(whole: Decimal) -> String {
    match (whole_number_formatter(), whole.to_f64()) {
        (Some(formatter), Some(number)) if !whole.is_zero() => formatter.fmt_string(number),
        _ => whole.to_string(),
    }
}

/// Format `amount` as dollars and cents, e.g. "-$1,234.50".
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let magnitude = rounded.abs();
    let whole = magnitude.trunc();
    let cents = ((magnitude - whole) * Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or_default();

    format!("{sign}${}.{cents:02}", group_thousands(whole))
}

/// Format `amount` rounded to whole dollars, e.g. "$1,235".
pub fn format_currency_rounded(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}${}", group_thousands(rounded.abs()))
}

/// Creates a span with `amount` rounded to the nearest whole number and a
/// tooltip (title) that shows `amount` rounded to two decimal places.
pub fn currency_rounded_with_tooltip(amount: Decimal) -> Markup {
    html!(
        span title=(format_currency(amount)) { (format_currency_rounded(amount)) }
    )
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html!(a href=(url) class=(LINK_STYLE) { (text) })
}

/// An edit link and a delete button for a table row.
///
/// The delete button removes the closest `tr` when the request succeeds and
/// shows the error alert otherwise.
pub fn edit_delete_action_links(edit_url: &str, delete_url: &str, confirm_message: &str) -> Markup {
    html! {
        div class="flex gap-4"
        {
            a href=(edit_url) class=(LINK_STYLE) { "Edit" }

            button
                hx-delete=(delete_url)
                hx-confirm=(confirm_message)
                hx-target="closest tr"
                hx-target-error="#alert-container"
                hx-swap="outerHTML"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}

/// Links to the previous and next period around the name of the shown one.
///
/// A side is left out when the period is at the edge of the supported range.
pub fn period_navigation(endpoint: &str, period: &Period) -> Markup {
    html! {
        nav class="flex items-center justify-between w-full max-w-md my-4" aria-label="Period"
        {
            @if let Some(previous) = period.previous() {
                a
                    href=(endpoints::with_period(endpoint, &previous))
                    class=(LINK_STYLE)
                    rel="prev"
                {
                    "← " (previous.label())
                }
            } @else {
                span {}
            }

            h2 class="text-xl font-semibold" { (period.label()) }

            @if let Some(next) = period.next() {
                a
                    href=(endpoints::with_period(endpoint, &next))
                    class=(LINK_STYLE)
                    rel="next"
                {
                    (next.label()) " →"
                }
            } @else {
                span {}
            }
        }
    }
}

/// The data quality warning listing records left out of the totals.
///
/// Renders nothing when every record has a date.
pub fn undated_records_warning(records: &[RecordRef]) -> Markup {
    html! {
        @if !records.is_empty() {
            div
                id="undated-records-warning"
                role="alert"
                class="w-full max-w-md p-4 my-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 dark:bg-gray-800 dark:text-yellow-300"
            {
                p class="font-semibold" {
                    "Some records have no date and were left out of the totals:"
                }

                ul class="list-disc list-inside" {
                    @for record in records {
                        li { (record) }
                    }
                }
            }
        }
    }
}

/// A summary card showing a labelled amount.
pub fn total_card(id: &str, label: &str, amount: Decimal) -> Markup {
    let amount_style = if amount.is_sign_negative() && !amount.is_zero() {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold"
    };

    html! {
        div id=(id) class="flex-1 p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class=(amount_style) { (currency_rounded_with_tooltip(amount)) }
        }
    }
}

/// The expense, income and net cashflow cards for a period.
pub fn summary_cards(summary: &CashflowSummary) -> Markup {
    html! {
        div class="flex flex-col w-full gap-4 md:flex-row lg:max-w-5xl"
        {
            (total_card("monthly-expense-total", "Spent", summary.monthly_expense_total))
            (total_card("monthly-income-total", "Received", summary.monthly_income_total))
            (total_card("net-cashflow", "Net cashflow", summary.net_cashflow))
        }
    }
}


#[cfg(test)]
mod period_navigation_tests {
    use scraper::{Html, Selector};

    use crate::{
        cashflow::{Period, RecordRef},
        html::{period_navigation, undated_records_warning},
    };

    #[test]
    fn links_to_neighbouring_periods() {
        let period = Period::new(2026, 1).unwrap();

        let html = Html::parse_fragment(&period_navigation("/dashboard", &period).into_string());

        let previous = html
            .select(&Selector::parse("a[rel=prev]").unwrap())
            .next()
            .unwrap();
        let next = html
            .select(&Selector::parse("a[rel=next]").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            previous.value().attr("href"),
            Some("/dashboard?period=2025-12")
        );
        assert_eq!(next.value().attr("href"), Some("/dashboard?period=2026-02"));
    }

    #[test]
    fn no_warning_without_undated_records() {
        assert_eq!(undated_records_warning(&[]).into_string(), "");
    }

    #[test]
    fn warning_lists_undated_records() {
        let markup = undated_records_warning(&[RecordRef::transaction(4), RecordRef::income(9)]);

        let html = Html::parse_fragment(&markup.into_string());
        let items: Vec<String> = html
            .select(&Selector::parse("li").unwrap())
            .map(|item| item.text().collect())
            .collect();
        assert_eq!(items, ["transaction #4", "income #9"]);
    }
}
