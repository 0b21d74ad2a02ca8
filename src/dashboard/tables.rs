//! The category breakdown table.

use std::collections::BTreeMap;

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    category::Category,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// The share of `total` taken by `amount`, as a whole percentage.
fn percentage_of(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }

    (amount / total * Decimal::ONE_HUNDRED).round()
}

/// Spending per category, largest first, with each category's share of the
/// month's expenses.
pub(super) fn category_table(
    category_totals: &BTreeMap<Category, Decimal>,
    expense_total: Decimal,
) -> Markup {
    let mut rows: Vec<(&Category, &Decimal)> = category_totals.iter().collect();
    rows.sort_by(|(_, a), (_, b)| b.cmp(a));

    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table
                id="categoryTotals"
                class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Spent" }
                        th scope="col" class="px-6 py-3 text-right" { "Share" }
                    }
                }

                tbody
                {
                    @for (category, total) in &rows {
                        tr class=(TABLE_ROW_STYLE) data-category=(category.as_str())
                        {
                            th
                                scope="row"
                                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                            {
                                (category.label())
                            }
                            td class="px-6 py-4 text-right tabular-nums" { (format_currency(**total)) }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                (percentage_of(**total, expense_total)) "%"
                            }
                        }
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td
                                colspan="3"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No spending this month."
                            }
                        }
                    }
                }
            }
        }
    }
}
