//! Approval rule models.

use serde::{Deserialize, Serialize};

/// A user picked as an approver in a rule draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    pub user_id: i64,
    pub display_name: String,
}

/// A normal approver with its 1-based position in the approval chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedApprover {
    pub user_id: i64,
    pub display_name: String,
    pub sequence: u32,
}

/// Body of `POST /rules/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRulePayload {
    pub name: String,
    /// Empty string when the admin gave no description.
    pub description: String,
    pub approval_percentage: f64,
    pub required_approvers: Vec<RequiredApproverRef>,
    pub normal_approvers: Vec<NormalApproverRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredApproverRef {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalApproverRef {
    pub user_id: i64,
    pub sequence: u32,
}

/// Approver entry on a stored rule. The backend may send a sequence for
/// required approvers too; it carries no meaning there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleApproverRef {
    pub user_id: i64,
    #[serde(default)]
    pub sequence: Option<u32>,
}

/// Approval rule as returned by `GET /rules/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRule {
    pub rule_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub approval_percentage: Option<f64>,
    #[serde(default)]
    pub required_approvers: Vec<RuleApproverRef>,
    #[serde(default)]
    pub normal_approvers: Vec<RuleApproverRef>,
}

impl ApprovalRule {
    /// Percentage to display; rules stored without one require everyone.
    pub fn effective_percentage(&self) -> f64 {
        self.approval_percentage
            .filter(|p| *p > 0.0)
            .unwrap_or(100.0)
    }

    /// Description, or a generated summary when the rule has none.
    pub fn display_description(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => crate::services::rule_builder::rule_summary(
                self.required_approvers.len(),
                self.normal_approvers.len(),
                self.effective_percentage(),
            ),
        }
    }
}

/// A stored rule as listed in the admin's rule table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleView {
    pub rule_id: i64,
    pub name: String,
    pub description: String,
    pub approval_percentage: f64,
    pub required_count: usize,
    pub normal_count: usize,
}

impl From<&ApprovalRule> for RuleView {
    fn from(rule: &ApprovalRule) -> Self {
        Self {
            rule_id: rule.rule_id,
            name: rule.name.clone(),
            description: rule.display_description(),
            approval_percentage: rule.effective_percentage(),
            required_count: rule.required_approvers.len(),
            normal_count: rule.normal_approvers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_deserialize_with_missing_lists() {
        let json = r#"{"rule_id": 3, "name": "Default", "description": null}"#;
        let rule: ApprovalRule = serde_json::from_str(json).unwrap();
        assert!(rule.required_approvers.is_empty());
        assert!(rule.normal_approvers.is_empty());
        assert_eq!(rule.effective_percentage(), 100.0);
    }

    #[test]
    fn test_display_description_falls_back_to_summary() {
        let json = r#"{
            "rule_id": 1,
            "name": "Travel",
            "description": "",
            "approval_percentage": 50,
            "required_approvers": [{"user_id": 1, "sequence": 1}],
            "normal_approvers": [
                {"user_id": 2, "sequence": 1},
                {"user_id": 3, "sequence": 2},
                {"user_id": 4, "sequence": 3}
            ]
        }"#;
        let rule: ApprovalRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.display_description(), "1 required, 2/3 normal (50%)");
    }

    #[test]
    fn test_display_description_prefers_stored_text() {
        let rule = ApprovalRule {
            rule_id: 1,
            name: "Travel".to_string(),
            description: Some("CFO signs off first".to_string()),
            approval_percentage: None,
            required_approvers: Vec::new(),
            normal_approvers: Vec::new(),
        };
        assert_eq!(rule.display_description(), "CFO signs off first");
    }

    #[test]
    fn test_rule_view_uses_display_fields() {
        let json = r#"{
            "rule_id": 5,
            "name": "Equipment",
            "description": "  ",
            "approval_percentage": 0,
            "required_approvers": [],
            "normal_approvers": [
                {"user_id": 2, "sequence": 1},
                {"user_id": 3, "sequence": 2}
            ]
        }"#;
        let rule: ApprovalRule = serde_json::from_str(json).unwrap();
        let view = RuleView::from(&rule);

        assert_eq!(view.description, "0 required, 2/2 normal (100%)");
        assert_eq!(view.approval_percentage, 100.0);
        assert_eq!(view.normal_count, 2);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["ruleId"], 5);
        assert_eq!(value["requiredCount"], 0);
        assert_eq!(value["approvalPercentage"], 100.0);
    }
}
