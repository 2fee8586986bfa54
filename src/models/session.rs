//! Signed-in session profile cached on disk.

use crate::models::user::User;
use serde::{Deserialize, Serialize};

/// The user that is signed in, plus the company currency once known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub user: User,
    pub company_currency: Option<String>,
    /// When the profile was written (Unix).
    pub cached_at: i64,
}
