//! Data models for the application.
//!
//! These models mirror the payloads of the expense backend, the rows kept in
//! the local SQLite database, and the data passed over IPC to the frontend.

pub mod approval_rule;
pub mod company;
pub mod currency;
pub mod expense;
pub mod session;
pub mod settings;
pub mod user;

// Re-exports for convenient access
pub use approval_rule::{
    ApprovalRule, ApprovalRulePayload, Approver, NormalApproverRef, RequiredApproverRef,
    RuleApproverRef, RuleView, SequencedApprover,
};
pub use company::Company;
pub use currency::Currency;
pub use expense::{
    ApprovalDecision, ApprovalReceipt, Expense, ExpenseApproval, ExpenseLine, ExpenseStatus,
    NewExpense, NewExpenseLine,
};
pub use session::SessionProfile;
pub use settings::AppSettings;
pub use user::{AuthToken, DirectoryUser, LoginRequest, NewUser, RuleAssignment, SignupRequest, User, UserRole};
