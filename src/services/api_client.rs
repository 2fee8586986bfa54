//! Expense backend API client.
//!
//! Typed HTTP client for the endpoints the desktop client uses. Requests
//! after sign-in carry the session's bearer token.

use crate::error::AppError;
use crate::models::settings::ApiSettings;
use crate::models::{
    ApprovalReceipt, ApprovalRule, ApprovalRulePayload, AuthToken, Company, DirectoryUser,
    Expense, LoginRequest, NewExpense, NewUser, RuleAssignment, SignupRequest, User,
};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Shortest password the backend accepts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ExpenseApiConfig {
    /// Base URL of the backend (e.g., `http://127.0.0.1:8000`).
    pub base_url: String,

    /// Bearer token; `None` before sign-in.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ExpenseApiConfig {
    pub fn from_settings(settings: &ApiSettings, token: Option<String>) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            token,
            timeout_secs: settings.timeout_secs,
        }
    }
}

/// Body of the approve and reject endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionComments {
    pub comments: Option<String>,
}

/// Expense backend client.
#[derive(Debug, Clone)]
pub struct ExpenseApiClient {
    client: Client,
    config: ExpenseApiConfig,
}

impl ExpenseApiClient {
    /// Create a new client.
    pub fn new(config: ExpenseApiConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        if let Some(token) = &config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::authentication("Invalid token format"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map an HTTP response to the expected body or an `AppError`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body, endpoint))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        let response = self.client.get(self.api_url(endpoint)).send().await?;
        self.handle_response(response, endpoint).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .client
            .post(self.api_url(endpoint))
            .json(body)
            .send()
            .await?;
        self.handle_response(response, endpoint).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .client
            .put(self.api_url(endpoint))
            .json(body)
            .send()
            .await?;
        self.handle_response(response, endpoint).await
    }

    // ---- auth -------------------------------------------------------------

    /// Create the first admin together with their company.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthToken, AppError> {
        check_password(&request.password)?;
        if request.company_name.trim().is_empty() {
            return Err(AppError::invalid_input_field(
                "Company name is required",
                "company_name",
            ));
        }
        let token: AuthToken = self.post("/auth/signup", request).await?;
        log::info!("Signed up {} as {}", token.user.email, token.user.role);
        Ok(token)
    }

    /// Exchange email and password for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, AppError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        match self.post::<_, AuthToken>("/auth/login", &request).await {
            Ok(token) => {
                log::info!("Signed in as {}", token.user.email);
                Ok(token)
            }
            // A 401 here means bad credentials, not an expired session.
            Err(AppError::AuthenticationExpired { .. }) => {
                Err(AppError::authentication("Incorrect email or password"))
            }
            Err(e) => Err(e),
        }
    }

    // ---- company and users -----------------------------------------------

    pub async fn get_company(&self, company_id: i64) -> Result<Company, AppError> {
        self.get(&format!("/companies/{}", company_id)).await
    }

    /// Users that can be picked as approvers.
    pub async fn list_directory(&self) -> Result<Vec<DirectoryUser>, AppError> {
        self.get("/auth/managers").await
    }

    /// Create a user in the caller's company (admin only).
    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        check_password(&user.password)?;
        let created: User = self.post("/auth/users", user).await?;
        log::info!("Created user {} ({})", created.user_id, created.role);
        Ok(created)
    }

    /// Attach an approval rule to a user, or detach it with `None`.
    pub async fn assign_rule(
        &self,
        user_id: i64,
        approval_rule_id: Option<i64>,
    ) -> Result<User, AppError> {
        self.put(
            &format!("/auth/users/{}", user_id),
            &RuleAssignment { approval_rule_id },
        )
        .await
    }

    // ---- approval rules --------------------------------------------------

    pub async fn list_rules(&self) -> Result<Vec<ApprovalRule>, AppError> {
        self.get("/rules/").await
    }

    pub async fn create_rule(&self, payload: &ApprovalRulePayload) -> Result<ApprovalRule, AppError> {
        let rule: ApprovalRule = self.post("/rules/", payload).await?;
        log::info!(
            "Created approval rule {} ({} required, {} normal)",
            rule.rule_id,
            rule.required_approvers.len(),
            rule.normal_approvers.len()
        );
        Ok(rule)
    }

    // ---- expenses --------------------------------------------------------

    /// Claims submitted by the signed-in user.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        self.get("/expenses/").await
    }

    pub async fn submit_expense(&self, expense: &NewExpense) -> Result<Expense, AppError> {
        let created: Expense = self.post("/expenses/", expense).await?;
        log::info!(
            "Submitted expense {} ({} lines)",
            created.expense_id,
            created.expense_lines.len()
        );
        Ok(created)
    }

    /// Claims waiting on the signed-in user.
    pub async fn pending_approvals(&self) -> Result<Vec<Expense>, AppError> {
        self.get("/expenses/pending-approvals").await
    }

    pub async fn approve_expense(
        &self,
        expense_id: i64,
        comments: Option<&str>,
    ) -> Result<ApprovalReceipt, AppError> {
        let body = approval_comments(comments);
        let receipt: ApprovalReceipt = self
            .post(&format!("/expenses/{}/approve", expense_id), &body)
            .await?;
        log::info!("Approved expense {}", expense_id);
        Ok(receipt)
    }

    /// Reject a claim. A reason is mandatory.
    pub async fn reject_expense(
        &self,
        expense_id: i64,
        comments: &str,
    ) -> Result<ApprovalReceipt, AppError> {
        let body = rejection_comments(comments)?;
        let receipt: ApprovalReceipt = self
            .post(&format!("/expenses/{}/reject", expense_id), &body)
            .await?;
        log::info!("Rejected expense {}", expense_id);
        Ok(receipt)
    }
}

/// Reject passwords the backend would refuse anyway.
pub fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input_field(
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            "password",
        ));
    }
    Ok(())
}

/// Approval comments are optional; blank ones are sent as `null`.
pub fn approval_comments(comments: Option<&str>) -> DecisionComments {
    DecisionComments {
        comments: comments
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    }
}

/// Rejections must say why.
pub fn rejection_comments(comments: &str) -> Result<DecisionComments, AppError> {
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input_field(
            "A reason is required to reject an expense",
            "comments",
        ));
    }
    Ok(DecisionComments {
        comments: Some(trimmed.to_string()),
    })
}

/// Build the error for a failed response.
///
/// The backend reports errors as `{"detail": "..."}`, or as a list of
/// `{"msg": ...}` objects for validation failures.
pub fn error_for_status(status: StatusCode, body: &str, endpoint: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        return AppError::authentication_expired("Session expired. Please sign in again.");
    }

    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .and_then(|d| match d {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                    .map(str::to_string)
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            other => Some(other.to_string()),
        });

    let status_code = status.as_u16();
    let message = match (status, detail) {
        (_, Some(detail)) => detail,
        (StatusCode::FORBIDDEN, None) => "Access denied".to_string(),
        (StatusCode::NOT_FOUND, None) => "Resource not found".to_string(),
        (_, None) if body.is_empty() => format!("Request failed ({})", status_code),
        (_, None) => format!("Request failed ({}): {}", status_code, body),
    };

    AppError::api_full(message, status_code, endpoint)
}
