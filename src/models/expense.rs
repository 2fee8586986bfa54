//! Expense claim models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an expense claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseStatus {
    Draft,
    Submitted,
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    /// Whether the claim is still waiting on an approver.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Submitted | Self::Pending)
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        };
        write!(f, "{}", s)
    }
}

/// A line item being added to a new claim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewExpenseLine {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub amount_local: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Receipt as a `data:` URL, see `services::receipts`.
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub expense_type: Option<String>,
}

/// Body of `POST /expenses/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: Option<String>,
    pub local_currency_code: String,
    pub expense_lines: Vec<NewExpenseLine>,
}

/// A stored line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub line_id: i64,
    pub expense_id: i64,
    pub category_id: Option<i64>,
    pub vendor_name: Option<String>,
    /// `YYYY-MM-DD` as stored by the backend.
    pub date: Option<String>,
    pub amount_local: f64,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
    pub expense_type: Option<String>,
}

/// Outcome an approver recorded on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
    Escalated,
}

/// One approval action on a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseApproval {
    pub approval_id: i64,
    pub approver_id: i64,
    pub status: ApprovalDecision,
    pub comments: Option<String>,
    pub approval_date: NaiveDateTime,
}

/// An expense claim as returned by the expense endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: i64,
    pub employee_id: i64,
    pub company_id: i64,
    pub submission_date: NaiveDateTime,
    pub description: Option<String>,
    pub status: ExpenseStatus,
    pub total_amount_local: f64,
    pub local_currency_code: String,
    /// Local-to-company rate applied by the backend.
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub total_amount_company_currency: Option<f64>,
    pub current_approval_step: i64,
    #[serde(default)]
    pub expense_lines: Vec<ExpenseLine>,
    #[serde(default)]
    pub expense_approvals: Vec<ExpenseApproval>,
}

/// Response of the approve and reject endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    pub message: String,
    pub approval_id: i64,
}
