//! Company model.

use serde::{Deserialize, Serialize};

/// Company details from `GET /companies/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    /// ISO 4217 code every expense is converted into (e.g. `USD`).
    pub default_currency_code: String,
}

/// Currency assumed when the company cannot be fetched.
pub const FALLBACK_CURRENCY: &str = "USD";
