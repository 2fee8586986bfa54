//! Line items of an expense claim being prepared for submission.

use crate::error::AppError;
use crate::models::currency::is_currency_code;
use crate::models::{NewExpense, NewExpenseLine};
use serde::Serialize;

/// Draft claim owned by one expense form session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseDraft {
    lines: Vec<NewExpenseLine>,
}

impl ExpenseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[NewExpenseLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a line item. The amount must be a positive number.
    pub fn add_line(&mut self, mut line: NewExpenseLine) -> Result<(), AppError> {
        if !line.amount_local.is_finite() || line.amount_local <= 0.0 {
            return Err(AppError::invalid_input_field(
                "Please enter a valid amount",
                "amount_local",
            ));
        }

        line.vendor_name = non_blank(line.vendor_name);
        line.description = non_blank(line.description);
        line.expense_type = non_blank(line.expense_type);
        self.lines.push(line);
        Ok(())
    }

    pub fn remove_line(&mut self, index: usize) -> Result<NewExpenseLine, AppError> {
        if index >= self.lines.len() {
            return Err(AppError::invalid_input_field(
                format!(
                    "Line {} does not exist ({} lines)",
                    index,
                    self.lines.len()
                ),
                "index",
            ));
        }
        Ok(self.lines.remove(index))
    }

    /// Sum of the line amounts in the claim's local currency.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.amount_local).sum()
    }

    /// Check the draft can be submitted in `currency_code`.
    pub fn validate(&self, currency_code: &str) -> Result<(), AppError> {
        if self.lines.is_empty() {
            return Err(AppError::invalid_input_field(
                "Please add at least one line item",
                "expense_lines",
            ));
        }
        if !is_currency_code(currency_code) {
            return Err(AppError::invalid_input_field(
                "Please select a currency",
                "local_currency_code",
            ));
        }
        Ok(())
    }

    /// Build the submission body.
    pub fn to_payload(&self, description: Option<String>, currency_code: &str) -> NewExpense {
        NewExpense {
            description: non_blank(description),
            local_currency_code: currency_code.to_string(),
            expense_lines: self.lines.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
