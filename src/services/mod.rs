//! Business logic services.
//!
//! The approval rule builder, expense draft and display helpers are plain
//! synchronous state. The API client, catalog loader and receipt reader do
//! I/O. None of them depend on the desktop shell.

pub mod api_client;
pub mod credentials;
pub mod currency_catalog;
pub mod currency_display;
pub mod expense_draft;
pub mod receipts;
pub mod rule_builder;
pub mod session;
pub mod user_directory;

pub use api_client::{ExpenseApiClient, ExpenseApiConfig};
pub use credentials::TokenStore;
pub use expense_draft::ExpenseDraft;
pub use rule_builder::{ApprovalRuleBuilder, ApproverList, MoveDirection, RuleBuilderError};
pub use session::Session;
pub use user_directory::UserDirectory;
