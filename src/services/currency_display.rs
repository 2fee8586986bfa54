//! Display figures for multi-currency expenses.
//!
//! Conversion happens on the backend; this module only decides which of the
//! returned amounts to show and in which currency.

use crate::models::{Expense, ExpenseLine, ExpenseStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Amount with its currency, formatted for display.
pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Exchange rate label, e.g. `1 EUR = 1.0850 USD`.
pub fn format_rate(from: &str, rate: f64, to: &str) -> String {
    format!("1 {} = {:.4} {}", from, rate, to)
}

/// Whether the claim was filed in a currency other than the company's.
pub fn currency_differs(expense: &Expense, company_currency: &str) -> bool {
    !expense
        .local_currency_code
        .eq_ignore_ascii_case(company_currency)
}

/// Company-currency total when the backend provided one, else the local total.
pub fn display_amount(expense: &Expense) -> f64 {
    expense
        .total_amount_company_currency
        .unwrap_or(expense.total_amount_local)
}

/// Whether the original amount and rate should be shown next to the total.
pub fn shows_conversion(expense: &Expense, company_currency: &str) -> bool {
    currency_differs(expense, company_currency)
        && expense.exchange_rate.is_some_and(|r| r != 1.0)
}

/// A line's amount in the company currency, using the claim's rate.
pub fn line_amount_in_company_currency(
    expense: &Expense,
    line: &ExpenseLine,
    company_currency: &str,
) -> f64 {
    match expense.exchange_rate {
        Some(rate) if currency_differs(expense, company_currency) => line.amount_local * rate,
        _ => line.amount_local,
    }
}

/// Total shown for a claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountView {
    pub primary: String,
    /// Amount in the claim's own currency when it was converted.
    pub original: Option<String>,
    pub rate: Option<String>,
}

/// One line of a claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub line_id: i64,
    pub vendor: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub amount: String,
    pub original: Option<String>,
    pub has_receipt: bool,
}

/// A claim ready for the history table or an approval card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub expense_id: i64,
    pub employee_id: i64,
    pub submitted_on: NaiveDate,
    pub description: String,
    pub status: ExpenseStatus,
    pub amount: AmountView,
    pub lines: Vec<LineView>,
}

/// Build the display figures for a claim.
pub fn expense_view(expense: &Expense, company_currency: &str) -> ExpenseView {
    let differs = currency_differs(expense, company_currency);
    let converted_total = expense
        .total_amount_company_currency
        .filter(|_| differs);

    let amount = AmountView {
        primary: match converted_total {
            Some(total) => format_amount(total, company_currency),
            None => format_amount(expense.total_amount_local, &expense.local_currency_code),
        },
        original: converted_total.map(|_| {
            format_amount(expense.total_amount_local, &expense.local_currency_code)
        }),
        rate: expense
            .exchange_rate
            .filter(|_| shows_conversion(expense, company_currency))
            .map(|rate| format_rate(&expense.local_currency_code, rate, company_currency)),
    };

    let line_currency = if differs && expense.exchange_rate.is_some() {
        company_currency
    } else {
        expense.local_currency_code.as_str()
    };

    let lines = expense
        .expense_lines
        .iter()
        .map(|line| LineView {
            line_id: line.line_id,
            vendor: line
                .vendor_name
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            description: line.description.clone(),
            date: line.date.clone(),
            amount: format_amount(
                line_amount_in_company_currency(expense, line, company_currency),
                line_currency,
            ),
            original: shows_conversion(expense, company_currency)
                .then(|| format_amount(line.amount_local, &expense.local_currency_code)),
            has_receipt: line.receipt_url.is_some(),
        })
        .collect();

    ExpenseView {
        expense_id: expense.expense_id,
        employee_id: expense.employee_id,
        submitted_on: expense.submission_date.date(),
        description: expense
            .description
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        status: expense.status,
        amount,
        lines,
    }
}

/// Sum of several claims in the company currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rollup {
    pub total: f64,
    pub currency: String,
    /// Claims left out because the backend sent no converted total.
    pub unconverted: usize,
}

pub fn rollup(expenses: &[Expense], company_currency: &str) -> Rollup {
    let mut total = 0.0;
    let mut unconverted = 0;

    for expense in expenses {
        if !currency_differs(expense, company_currency) {
            total += display_amount(expense);
        } else if let Some(converted) = expense.total_amount_company_currency {
            total += converted;
        } else {
            unconverted += 1;
        }
    }

    Rollup {
        total,
        currency: company_currency.to_string(),
        unconverted,
    }
}
