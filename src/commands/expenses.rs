//! Expense claim commands.

use crate::commands::{expire_on_unauthorized, SessionState};
use crate::error::AppError;
use crate::models::NewExpenseLine;
use crate::services::currency_display::{expense_view, rollup, ExpenseView, Rollup};
use crate::services::{receipts, ExpenseDraft};
use serde::Serialize;
use std::path::PathBuf;
use tauri::State;

/// Draft claim as shown in the expense form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub lines: Vec<NewExpenseLine>,
    pub total: f64,
}

impl From<&ExpenseDraft> for DraftView {
    fn from(draft: &ExpenseDraft) -> Self {
        Self {
            lines: draft.lines().to_vec(),
            total: draft.total(),
        }
    }
}

/// Submitted claims with their display figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseHistory {
    pub expenses: Vec<ExpenseView>,
    pub rollup: Rollup,
}

#[tauri::command]
pub async fn get_expense_draft(state: State<'_, SessionState>) -> Result<DraftView, AppError> {
    Ok(DraftView::from(&state.0.lock().await.expense_draft))
}

/// Add a line, embedding the receipt file when one is given.
#[tauri::command]
pub async fn add_draft_line(
    state: State<'_, SessionState>,
    line: NewExpenseLine,
    receipt_path: Option<PathBuf>,
) -> Result<DraftView, AppError> {
    let mut line = line;
    if let Some(path) = receipt_path {
        line.receipt_url = Some(receipts::load_receipt(&path).await?);
    }

    let mut session = state.0.lock().await;
    session.expense_draft.add_line(line)?;
    Ok(DraftView::from(&session.expense_draft))
}

#[tauri::command]
pub async fn remove_draft_line(
    state: State<'_, SessionState>,
    index: usize,
) -> Result<DraftView, AppError> {
    let mut session = state.0.lock().await;
    session.expense_draft.remove_line(index)?;
    Ok(DraftView::from(&session.expense_draft))
}

#[tauri::command]
pub async fn reset_expense_draft(state: State<'_, SessionState>) -> Result<DraftView, AppError> {
    let mut session = state.0.lock().await;
    session.expense_draft.reset();
    Ok(DraftView::from(&session.expense_draft))
}

/// Submit the draft in `currency_code` and clear it on success.
#[tauri::command]
pub async fn submit_expense(
    state: State<'_, SessionState>,
    description: Option<String>,
    currency_code: String,
) -> Result<ExpenseView, AppError> {
    let currency_code = currency_code.trim().to_uppercase();
    let (api, payload, company_currency) = {
        let session = state.0.lock().await;
        session.expense_draft.validate(&currency_code)?;
        (
            session.api()?,
            session.expense_draft.to_payload(description, &currency_code),
            session.company_currency().to_string(),
        )
    };

    let expense = expire_on_unauthorized(state.inner(), api.submit_expense(&payload).await).await?;
    state.0.lock().await.expense_draft.reset();
    Ok(expense_view(&expense, &company_currency))
}

/// The signed-in user's claims, newest first.
#[tauri::command]
pub async fn list_expenses(state: State<'_, SessionState>) -> Result<ExpenseHistory, AppError> {
    let (api, company_currency) = {
        let session = state.0.lock().await;
        (session.api()?, session.company_currency().to_string())
    };

    let mut expenses = expire_on_unauthorized(state.inner(), api.list_expenses().await).await?;
    expenses.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));

    Ok(ExpenseHistory {
        rollup: rollup(&expenses, &company_currency),
        expenses: expenses
            .iter()
            .map(|e| expense_view(e, &company_currency))
            .collect(),
    })
}
