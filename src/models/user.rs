//! User and authentication models.

use serde::{Deserialize, Serialize};

/// Role of a user within a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Manager,
    Employee,
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            _ => Self::Employee,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::Manager => write!(f, "Manager"),
            Self::Employee => write!(f, "Employee"),
        }
    }
}

/// A user as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub company_id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub is_manager_approver: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Entry of the company user directory (`GET /auth/managers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub user_id: i64,
    pub name: String,
    pub role: UserRole,
}

/// Token response from signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Body of the first-admin signup, which also creates the company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub password: String,
    pub company_name: String,
    pub currency_code: String,
}

/// Body of the login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/users` (admin creates a user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub is_manager_approver: bool,
}

/// Body of `PUT /auth/users/{id}` when assigning an approval rule.
///
/// `None` is sent as `null` and removes the assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleAssignment {
    pub approval_rule_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialize() {
        let json = r#"{
            "user_id": 4,
            "company_id": 1,
            "email": "ana@example.com",
            "name": "Ana",
            "role": "Manager",
            "manager_id": null,
            "is_manager_approver": true
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Manager);
        assert!(user.is_manager_approver);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(UserRole::from("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from("manager"), UserRole::Manager);
        assert_eq!(UserRole::from("contractor"), UserRole::Employee);
        assert_eq!(UserRole::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_rule_assignment_sends_null() {
        let json = serde_json::to_string(&RuleAssignment {
            approval_rule_id: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"approval_rule_id":null}"#);
    }
}
