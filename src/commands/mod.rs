//! Tauri IPC command handlers.
//!
//! Commands are organized by functionality:
//! - `auth`: signup, sign-in, sign-out and user administration
//! - `rules`: the approval rule builder and rule assignment
//! - `expenses`: the expense draft, submission and history
//! - `approvals`: the approver's queue
//! - `currencies`: the currency catalog
//! - `settings`: application settings

pub mod approvals;
pub mod auth;
pub mod currencies;
pub mod expenses;
pub mod rules;
pub mod settings;

pub use approvals::{approve_expense, list_pending_approvals, reject_expense};
pub use auth::{create_user, get_session, list_managers, list_users, login, logout, signup};
pub use currencies::list_currencies;
pub use expenses::{
    add_draft_line, get_expense_draft, list_expenses, remove_draft_line, reset_expense_draft,
    submit_expense,
};
pub use rules::{
    add_rule_approver, assign_rule, get_rule_builder, list_rules, move_rule_approver,
    open_rule_builder, remove_rule_approver, reset_rule_builder, set_rule_details,
    set_rule_percentage, submit_rule,
};
pub use settings::{get_settings, update_settings};

use crate::error::AppError;
use crate::services::TokenStore;
use tokio::sync::Mutex;

pub use crate::services::session::Session;

/// Managed state wrapper.
#[derive(Debug, Default)]
pub struct SessionState(pub Mutex<Session>);

/// Sign the window out when the backend says the token is no longer valid.
///
/// The token is also removed from the keychain so `get_session` cannot
/// restore it.
pub async fn expire_on_unauthorized<T>(
    state: &SessionState,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    if let Err(e) = &result {
        if e.is_authentication_expired() {
            log::warn!("Session token rejected, signing out");
            let api_url = state.0.lock().await.expire();
            if let Some(api_url) = api_url {
                if let Err(clear_err) = TokenStore::clear(&api_url) {
                    log::warn!("Failed to remove rejected token: {}", clear_err);
                }
            }
        }
    }
    result
}
