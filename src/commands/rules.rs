//! Approval rule commands.
//!
//! Every edit goes through the window's `ApprovalRuleBuilder` and returns the
//! updated view, so the form always renders what the builder holds.

use crate::commands::{expire_on_unauthorized, SessionState};
use crate::error::AppError;
use crate::models::{Approver, ApprovalRule, RuleView, SequencedApprover, User};
use crate::services::{ApprovalRuleBuilder, ApproverList, MoveDirection, UserDirectory};
use serde::Serialize;
use tauri::State;

/// Snapshot of the rule builder for the form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBuilderView {
    pub name: String,
    pub description: Option<String>,
    pub approval_percentage: f64,
    pub required_approvers: Vec<Approver>,
    pub normal_approvers: Vec<SequencedApprover>,
    pub normal_approvers_needed: usize,
    pub summary: String,
}

impl From<&ApprovalRuleBuilder> for RuleBuilderView {
    fn from(builder: &ApprovalRuleBuilder) -> Self {
        Self {
            name: builder.name().to_string(),
            description: builder.description().map(str::to_string),
            approval_percentage: builder.approval_percentage(),
            required_approvers: builder.required_approvers().to_vec(),
            normal_approvers: builder.normal_approvers().to_vec(),
            normal_approvers_needed: builder.normal_approvers_needed(),
            summary: builder.summary(),
        }
    }
}

/// Start a new rule: fresh builder plus a fresh user directory.
#[tauri::command]
pub async fn open_rule_builder(state: State<'_, SessionState>) -> Result<RuleBuilderView, AppError> {
    let api = {
        let session = state.0.lock().await;
        session.require_admin()?;
        session.api()?
    };
    let users = expire_on_unauthorized(state.inner(), api.list_directory().await).await?;

    let mut session = state.0.lock().await;
    session.directory = UserDirectory::new(users);
    session.rule_builder = ApprovalRuleBuilder::new();
    Ok(RuleBuilderView::from(&session.rule_builder))
}

#[tauri::command]
pub async fn get_rule_builder(state: State<'_, SessionState>) -> Result<RuleBuilderView, AppError> {
    let session = state.0.lock().await;
    Ok(RuleBuilderView::from(&session.rule_builder))
}

#[tauri::command]
pub async fn set_rule_details(
    state: State<'_, SessionState>,
    name: String,
    description: Option<String>,
) -> Result<RuleBuilderView, AppError> {
    let mut session = state.0.lock().await;
    session.rule_builder.set_name(name);
    session.rule_builder.set_description(description);
    Ok(RuleBuilderView::from(&session.rule_builder))
}

#[tauri::command]
pub async fn set_rule_percentage(
    state: State<'_, SessionState>,
    percentage: f64,
) -> Result<RuleBuilderView, AppError> {
    let mut session = state.0.lock().await;
    session.rule_builder.set_approval_percentage(percentage)?;
    Ok(RuleBuilderView::from(&session.rule_builder))
}

/// Add a user from the directory to one of the approver lists.
#[tauri::command]
pub async fn add_rule_approver(
    state: State<'_, SessionState>,
    list: ApproverList,
    user_id: i64,
) -> Result<RuleBuilderView, AppError> {
    let mut session = state.0.lock().await;
    let approver = session
        .directory
        .approver(user_id)
        .ok_or_else(|| AppError::not_found_with_id("User", user_id.to_string()))?;

    match list {
        ApproverList::Required => session
            .rule_builder
            .add_required(approver.user_id, approver.display_name)?,
        ApproverList::Normal => session
            .rule_builder
            .add_normal(approver.user_id, approver.display_name)?,
    }
    Ok(RuleBuilderView::from(&session.rule_builder))
}

#[tauri::command]
pub async fn remove_rule_approver(
    state: State<'_, SessionState>,
    list: ApproverList,
    index: usize,
) -> Result<RuleBuilderView, AppError> {
    let mut session = state.0.lock().await;
    match list {
        ApproverList::Required => {
            session.rule_builder.remove_required(index)?;
        }
        ApproverList::Normal => {
            session.rule_builder.remove_normal(index)?;
        }
    }
    Ok(RuleBuilderView::from(&session.rule_builder))
}

/// Move a normal approver one step. Moves past either end are ignored.
#[tauri::command]
pub async fn move_rule_approver(
    state: State<'_, SessionState>,
    index: usize,
    direction: MoveDirection,
) -> Result<RuleBuilderView, AppError> {
    let mut session = state.0.lock().await;
    session.rule_builder.move_normal(index, direction)?;
    Ok(RuleBuilderView::from(&session.rule_builder))
}

/// Clear both approver lists, keeping name and percentage.
#[tauri::command]
pub async fn reset_rule_builder(
    state: State<'_, SessionState>,
) -> Result<RuleBuilderView, AppError> {
    let mut session = state.0.lock().await;
    session.rule_builder.reset();
    Ok(RuleBuilderView::from(&session.rule_builder))
}

/// Validate and create the rule, then start a new draft.
#[tauri::command]
pub async fn submit_rule(state: State<'_, SessionState>) -> Result<ApprovalRule, AppError> {
    let (api, payload) = {
        let session = state.0.lock().await;
        session.require_admin()?;
        session.rule_builder.validate()?;
        (session.api()?, session.rule_builder.to_payload())
    };

    let rule = expire_on_unauthorized(state.inner(), api.create_rule(&payload).await).await?;
    state.0.lock().await.rule_builder = ApprovalRuleBuilder::new();
    Ok(rule)
}

/// Stored rules, with a generated description where none was given.
#[tauri::command]
pub async fn list_rules(state: State<'_, SessionState>) -> Result<Vec<RuleView>, AppError> {
    let api = state.0.lock().await.api()?;
    let rules = expire_on_unauthorized(state.inner(), api.list_rules().await).await?;
    Ok(rules.iter().map(RuleView::from).collect())
}

/// Attach a rule to a user, or detach it with `rule_id: null`.
#[tauri::command]
pub async fn assign_rule(
    state: State<'_, SessionState>,
    user_id: i64,
    rule_id: Option<i64>,
) -> Result<User, AppError> {
    let api = {
        let session = state.0.lock().await;
        session.require_admin()?;
        session.api()?
    };
    expire_on_unauthorized(state.inner(), api.assign_rule(user_id, rule_id).await).await
}
