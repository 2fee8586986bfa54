//! Currency model.

use serde::{Deserialize, Serialize};

/// A selectable currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code.
    pub code: String,
    pub name: String,
    /// Display symbol; the code when the source has none.
    pub symbol: String,
}

impl Currency {
    /// Label used in currency pickers, e.g. `EUR - Euro (€)`.
    pub fn label(&self) -> String {
        format!("{} - {} ({})", self.code, self.name, self.symbol)
    }
}

/// Whether `code` looks like an ISO 4217 code.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}
