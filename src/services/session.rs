//! Per-window state of the signed-in user.

use crate::error::AppError;
use crate::models::{company::FALLBACK_CURRENCY, User};
use crate::services::{ApprovalRuleBuilder, ExpenseApiClient, ExpenseDraft, UserDirectory};

/// State of the signed-in window.
///
/// The rule builder and expense draft belong to the open forms and are
/// replaced, not shared, when a form is opened again.
#[derive(Debug, Default)]
pub struct Session {
    pub api: Option<ExpenseApiClient>,
    pub user: Option<User>,
    pub company_currency: Option<String>,
    pub directory: UserDirectory,
    pub rule_builder: ApprovalRuleBuilder,
    pub expense_draft: ExpenseDraft,
}

impl Session {
    /// Client for authenticated calls.
    pub fn api(&self) -> Result<ExpenseApiClient, AppError> {
        self.api
            .clone()
            .ok_or_else(|| AppError::authentication("Not signed in"))
    }

    pub fn user(&self) -> Result<&User, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::authentication("Not signed in"))
    }

    /// Fail unless the signed-in user is an admin.
    pub fn require_admin(&self) -> Result<&User, AppError> {
        let user = self.user()?;
        if !user.is_admin() {
            return Err(AppError::authentication("Only admins can do this"));
        }
        Ok(user)
    }

    pub fn company_currency(&self) -> &str {
        self.company_currency.as_deref().unwrap_or(FALLBACK_CURRENCY)
    }

    /// Drop everything tied to the signed-in user.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Sign out after the backend rejected the token.
    ///
    /// Returns the API URL the rejected token was issued by, so the caller
    /// can remove it from the keychain.
    pub fn expire(&mut self) -> Option<String> {
        let api_url = self.api.as_ref().map(|api| api.base_url().to_string());
        self.clear();
        api_url
    }
}
