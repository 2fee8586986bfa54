//! Approver queue commands.

use crate::commands::{expire_on_unauthorized, SessionState};
use crate::error::AppError;
use crate::models::ApprovalReceipt;
use crate::services::currency_display::{expense_view, ExpenseView};
use tauri::State;

/// Claims waiting on the signed-in user, in company currency.
#[tauri::command]
pub async fn list_pending_approvals(
    state: State<'_, SessionState>,
) -> Result<Vec<ExpenseView>, AppError> {
    let (api, company_currency) = {
        let session = state.0.lock().await;
        (session.api()?, session.company_currency().to_string())
    };

    let pending = expire_on_unauthorized(state.inner(), api.pending_approvals().await).await?;
    Ok(pending
        .iter()
        .map(|e| expense_view(e, &company_currency))
        .collect())
}

#[tauri::command]
pub async fn approve_expense(
    state: State<'_, SessionState>,
    expense_id: i64,
    comments: Option<String>,
) -> Result<ApprovalReceipt, AppError> {
    let api = state.0.lock().await.api()?;
    expire_on_unauthorized(
        state.inner(),
        api.approve_expense(expense_id, comments.as_deref()).await,
    )
    .await
}

/// Reject a claim. `comments` must give a reason.
#[tauri::command]
pub async fn reject_expense(
    state: State<'_, SessionState>,
    expense_id: i64,
    comments: String,
) -> Result<ApprovalReceipt, AppError> {
    let api = state.0.lock().await.api()?;
    expire_on_unauthorized(state.inner(), api.reject_expense(expense_id, &comments).await).await
}
