//! Client-side approval rule builder.
//!
//! Holds the draft an admin edits before creating an approval rule: a set of
//! required approvers and an ordered chain of normal approvers. The backend
//! owns rule evaluation; this type only keeps the draft consistent and
//! produces the creation payload.

use crate::models::approval_rule::{
    ApprovalRulePayload, Approver, NormalApproverRef, RequiredApproverRef, SequencedApprover,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Percentage used when a draft is opened.
pub const DEFAULT_APPROVAL_PERCENTAGE: f64 = 100.0;

/// Which approver list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApproverList {
    Required,
    Normal,
}

impl std::fmt::Display for ApproverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// Direction for reordering a normal approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Expected, user-correctable rejections of a draft edit.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum RuleBuilderError {
    #[error("User {user_id} is already a {list} approver")]
    DuplicateApprover { user_id: i64, list: ApproverList },

    #[error("Index {index} is out of range for the {list} approver list ({len} entries)")]
    IndexOutOfRange {
        list: ApproverList,
        index: usize,
        len: usize,
    },

    #[error("Approval percentage must be between 0 and 100, got {value}")]
    InvalidPercentage { value: f64 },

    #[error("Approval rule name is required")]
    MissingName,

    #[error("Add at least one approver (required or normal)")]
    NoApprovers,
}

/// Draft of an approval rule, owned by a single form session.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRuleBuilder {
    name: String,
    description: Option<String>,
    approval_percentage: f64,
    required: Vec<Approver>,
    normal: Vec<SequencedApprover>,
}

impl Default for ApprovalRuleBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            approval_percentage: DEFAULT_APPROVAL_PERCENTAGE,
            required: Vec::new(),
            normal: Vec::new(),
        }
    }
}

impl ApprovalRuleBuilder {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn approval_percentage(&self) -> f64 {
        self.approval_percentage
    }

    pub fn required_approvers(&self) -> &[Approver] {
        &self.required
    }

    pub fn normal_approvers(&self) -> &[SequencedApprover] {
        &self.normal
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    /// Set the description. Blank input clears it.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }

    /// Set the share of normal approvers whose approval satisfies the rule.
    pub fn set_approval_percentage(&mut self, percentage: f64) -> Result<(), RuleBuilderError> {
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(RuleBuilderError::InvalidPercentage { value: percentage });
        }
        self.approval_percentage = percentage;
        Ok(())
    }

    /// Add a required approver.
    pub fn add_required(
        &mut self,
        user_id: i64,
        display_name: impl Into<String>,
    ) -> Result<(), RuleBuilderError> {
        if self.required.iter().any(|a| a.user_id == user_id) {
            return Err(RuleBuilderError::DuplicateApprover {
                user_id,
                list: ApproverList::Required,
            });
        }

        self.required.push(Approver {
            user_id,
            display_name: display_name.into(),
        });
        Ok(())
    }

    /// Append a normal approver at the end of the chain.
    pub fn add_normal(
        &mut self,
        user_id: i64,
        display_name: impl Into<String>,
    ) -> Result<(), RuleBuilderError> {
        if self.normal.iter().any(|a| a.user_id == user_id) {
            return Err(RuleBuilderError::DuplicateApprover {
                user_id,
                list: ApproverList::Normal,
            });
        }

        let sequence = self.normal.len() as u32 + 1;
        self.normal.push(SequencedApprover {
            user_id,
            display_name: display_name.into(),
            sequence,
        });
        Ok(())
    }

    /// Remove a required approver by position.
    pub fn remove_required(&mut self, index: usize) -> Result<Approver, RuleBuilderError> {
        if index >= self.required.len() {
            return Err(RuleBuilderError::IndexOutOfRange {
                list: ApproverList::Required,
                index,
                len: self.required.len(),
            });
        }
        Ok(self.required.remove(index))
    }

    /// Remove a normal approver by position and close the gap in the sequence.
    pub fn remove_normal(&mut self, index: usize) -> Result<SequencedApprover, RuleBuilderError> {
        self.check_normal_index(index)?;

        let removed = self.normal.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Swap a normal approver with its neighbour.
    ///
    /// Returns `Ok(false)` without touching the chain when the move would
    /// leave the list (first entry up, last entry down).
    pub fn move_normal(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<bool, RuleBuilderError> {
        self.check_normal_index(index)?;

        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.normal.len()),
        };

        let Some(target) = target else {
            return Ok(false);
        };

        self.normal.swap(index, target);
        self.renumber();
        Ok(true)
    }

    /// Number of normal approvers that must approve at the given percentage.
    ///
    /// The caller is responsible for keeping `percentage` within 0..=100.
    pub fn compute_normal_approvers_needed(&self, percentage: f64) -> usize {
        normal_approvers_needed(self.normal.len(), percentage)
    }

    /// Number of normal approvers needed at the draft's own percentage.
    pub fn normal_approvers_needed(&self) -> usize {
        self.compute_normal_approvers_needed(self.approval_percentage)
    }

    /// Check the draft can be submitted.
    pub fn validate(&self) -> Result<(), RuleBuilderError> {
        if self.name.is_empty() {
            return Err(RuleBuilderError::MissingName);
        }
        if self.required.is_empty() && self.normal.is_empty() {
            return Err(RuleBuilderError::NoApprovers);
        }
        Ok(())
    }

    /// Build the rule creation payload from the current draft.
    pub fn to_payload(&self) -> ApprovalRulePayload {
        ApprovalRulePayload {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            approval_percentage: self.approval_percentage,
            required_approvers: self
                .required
                .iter()
                .map(|a| RequiredApproverRef { user_id: a.user_id })
                .collect(),
            normal_approvers: self
                .normal
                .iter()
                .map(|a| NormalApproverRef {
                    user_id: a.user_id,
                    sequence: a.sequence,
                })
                .collect(),
        }
    }

    /// Short preview, e.g. `2 required, 3/4 normal (75%)`.
    pub fn summary(&self) -> String {
        rule_summary(
            self.required.len(),
            self.normal.len(),
            self.approval_percentage,
        )
    }

    /// Clear both approver lists.
    pub fn reset(&mut self) {
        self.required.clear();
        self.normal.clear();
    }

    fn check_normal_index(&self, index: usize) -> Result<(), RuleBuilderError> {
        if index >= self.normal.len() {
            return Err(RuleBuilderError::IndexOutOfRange {
                list: ApproverList::Normal,
                index,
                len: self.normal.len(),
            });
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (i, approver) in self.normal.iter_mut().enumerate() {
            approver.sequence = i as u32 + 1;
        }
    }
}

/// `ceil(count * percentage / 100)`, floored at zero.
pub fn normal_approvers_needed(count: usize, percentage: f64) -> usize {
    let needed = (count as f64 * percentage / 100.0).ceil();
    if needed.is_nan() || needed <= 0.0 {
        0
    } else {
        needed as usize
    }
}

/// Preview text shared by drafts and stored rules.
pub fn rule_summary(required: usize, normal: usize, percentage: f64) -> String {
    format!(
        "{} required, {}/{} normal ({}%)",
        required,
        normal_approvers_needed(normal, percentage),
        normal,
        percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequences(builder: &ApprovalRuleBuilder) -> Vec<u32> {
        builder.normal_approvers().iter().map(|a| a.sequence).collect()
    }

    fn names(builder: &ApprovalRuleBuilder) -> Vec<&str> {
        builder
            .normal_approvers()
            .iter()
            .map(|a| a.display_name.as_str())
            .collect()
    }

    #[test]
    fn test_add_normal_assigns_next_sequence() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_normal(10, "Ana").unwrap();
        builder.add_normal(11, "Ben").unwrap();

        assert_eq!(sequences(&builder), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_required_is_rejected() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_required(1, "Ana").unwrap();

        let err = builder.add_required(1, "Ana again").unwrap_err();
        assert_eq!(
            err,
            RuleBuilderError::DuplicateApprover {
                user_id: 1,
                list: ApproverList::Required
            }
        );
        assert_eq!(builder.required_approvers().len(), 1);
        assert_eq!(builder.required_approvers()[0].display_name, "Ana");
    }

    #[test]
    fn test_duplicate_normal_is_rejected() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_normal(1, "Ana").unwrap();

        assert!(matches!(
            builder.add_normal(1, "Ana"),
            Err(RuleBuilderError::DuplicateApprover {
                list: ApproverList::Normal,
                ..
            })
        ));
        assert_eq!(builder.normal_approvers().len(), 1);
    }

    #[test]
    fn test_same_user_may_be_required_and_normal() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_required(5, "Eve").unwrap();
        builder.add_normal(5, "Eve").unwrap();

        assert_eq!(builder.required_approvers().len(), 1);
        assert_eq!(builder.normal_approvers().len(), 1);
    }

    #[test]
    fn test_remove_required_out_of_range() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_required(1, "Ana").unwrap();

        let err = builder.remove_required(3).unwrap_err();
        assert_eq!(
            err,
            RuleBuilderError::IndexOutOfRange {
                list: ApproverList::Required,
                index: 3,
                len: 1
            }
        );

        let removed = builder.remove_required(0).unwrap();
        assert_eq!(removed.user_id, 1);
        assert!(builder.required_approvers().is_empty());
    }

    #[test]
    fn test_remove_normal_renumbers() {
        let mut builder = ApprovalRuleBuilder::new();
        for (id, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
            builder.add_normal(id, name).unwrap();
        }

        builder.remove_normal(1).unwrap();
        assert_eq!(names(&builder), vec!["A", "C", "D"]);
        assert_eq!(sequences(&builder), vec![1, 2, 3]);

        assert!(builder.remove_normal(3).is_err());
        assert_eq!(sequences(&builder), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_normal_at_edges_is_noop() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_normal(1, "A").unwrap();
        builder.add_normal(2, "B").unwrap();

        assert!(!builder.move_normal(0, MoveDirection::Up).unwrap());
        assert!(!builder.move_normal(1, MoveDirection::Down).unwrap());
        assert_eq!(names(&builder), vec!["A", "B"]);
        assert_eq!(sequences(&builder), vec![1, 2]);
    }

    #[test]
    fn test_move_normal_invalid_index() {
        let mut builder = ApprovalRuleBuilder::new();
        assert!(matches!(
            builder.move_normal(0, MoveDirection::Down),
            Err(RuleBuilderError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn test_move_then_remove_scenario() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_normal(1, "A").unwrap();
        builder.add_normal(2, "B").unwrap();
        builder.add_normal(3, "C").unwrap();

        assert!(builder.move_normal(1, MoveDirection::Up).unwrap());
        assert_eq!(names(&builder), vec!["B", "A", "C"]);
        assert_eq!(sequences(&builder), vec![1, 2, 3]);

        builder.remove_normal(1).unwrap();
        assert_eq!(names(&builder), vec!["B", "C"]);
        assert_eq!(sequences(&builder), vec![1, 2]);
    }

    #[test]
    fn test_compute_normal_approvers_needed() {
        let mut builder = ApprovalRuleBuilder::new();
        assert_eq!(builder.compute_normal_approvers_needed(75.0), 0);
        assert_eq!(builder.compute_normal_approvers_needed(100.0), 0);

        for id in 1..=4 {
            builder.add_normal(id, format!("user {}", id)).unwrap();
        }
        assert_eq!(builder.compute_normal_approvers_needed(75.0), 3);
        assert_eq!(builder.compute_normal_approvers_needed(0.0), 0);
        assert_eq!(builder.compute_normal_approvers_needed(1.0), 1);

        builder.remove_normal(3).unwrap();
        assert_eq!(builder.compute_normal_approvers_needed(50.0), 2);
    }

    #[test]
    fn test_set_approval_percentage_bounds() {
        let mut builder = ApprovalRuleBuilder::new();
        assert_eq!(builder.approval_percentage(), 100.0);

        builder.set_approval_percentage(0.0).unwrap();
        builder.set_approval_percentage(65.0).unwrap();
        assert_eq!(builder.approval_percentage(), 65.0);

        for bad in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                builder.set_approval_percentage(bad),
                Err(RuleBuilderError::InvalidPercentage { .. })
            ));
        }
        assert_eq!(builder.approval_percentage(), 65.0);
    }

    #[test]
    fn test_empty_payload() {
        let builder = ApprovalRuleBuilder::new();
        let payload = serde_json::to_value(builder.to_payload()).unwrap();

        assert_eq!(payload["name"], "");
        assert_eq!(payload["description"], "");
        assert_eq!(payload["approval_percentage"], 100.0);
        assert_eq!(payload["required_approvers"], serde_json::json!([]));
        assert_eq!(payload["normal_approvers"], serde_json::json!([]));
    }

    #[test]
    fn test_payload_shape() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.set_name("  Travel over 500  ");
        builder.set_description(Some("   ".to_string()));
        builder.set_approval_percentage(50.0).unwrap();
        builder.add_required(9, "CFO").unwrap();
        builder.add_normal(3, "Lead").unwrap();
        builder.add_normal(4, "Manager").unwrap();

        let payload = serde_json::to_value(builder.to_payload()).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "name": "Travel over 500",
                "description": "",
                "approval_percentage": 50.0,
                "required_approvers": [{ "user_id": 9 }],
                "normal_approvers": [
                    { "user_id": 3, "sequence": 1 },
                    { "user_id": 4, "sequence": 2 }
                ]
            })
        );

        // Building the payload leaves the draft untouched.
        assert_eq!(builder.normal_approvers().len(), 2);
    }

    #[test]
    fn test_validate() {
        let mut builder = ApprovalRuleBuilder::new();
        assert_eq!(builder.validate(), Err(RuleBuilderError::MissingName));

        builder.set_name("Default");
        assert_eq!(builder.validate(), Err(RuleBuilderError::NoApprovers));

        builder.add_required(1, "Ana").unwrap();
        assert_eq!(builder.validate(), Ok(()));
    }

    #[test]
    fn test_summary() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_required(1, "A").unwrap();
        for id in 2..=5 {
            builder.add_normal(id, "n").unwrap();
        }
        builder.set_approval_percentage(75.0).unwrap();

        assert_eq!(builder.summary(), "1 required, 3/4 normal (75%)");
    }

    #[test]
    fn test_reset_clears_lists() {
        let mut builder = ApprovalRuleBuilder::new();
        builder.add_required(1, "A").unwrap();
        builder.add_normal(2, "B").unwrap();

        builder.reset();

        assert!(builder.required_approvers().is_empty());
        assert!(builder.normal_approvers().is_empty());
        builder.add_normal(2, "B").unwrap();
        assert_eq!(sequences(&builder), vec![1]);
    }

    #[test]
    fn test_error_messages() {
        let err = RuleBuilderError::IndexOutOfRange {
            list: ApproverList::Normal,
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Index 4 is out of range for the normal approver list (2 entries)"
        );
    }

    const OPERATIONS: usize = 7;

    fn apply(
        builder: &mut ApprovalRuleBuilder,
        op: usize,
        next_id: i64,
    ) -> Result<(), RuleBuilderError> {
        let last = builder.normal_approvers().len().saturating_sub(1);
        match op {
            0 => builder.add_normal(next_id, format!("user {}", next_id)),
            1 => builder.add_normal(100, "user 100"),
            2 => builder.remove_normal(0).map(|_| ()),
            3 => builder.remove_normal(last).map(|_| ()),
            4 => builder.move_normal(0, MoveDirection::Down).map(|_| ()),
            5 => builder.move_normal(last, MoveDirection::Up).map(|_| ()),
            _ => builder.move_normal(1, MoveDirection::Up).map(|_| ()),
        }
    }

    fn sorted_ids(builder: &ApprovalRuleBuilder) -> Vec<i64> {
        let mut ids: Vec<i64> = builder.normal_approvers().iter().map(|a| a.user_id).collect();
        ids.sort_unstable();
        ids
    }

    fn explore(builder: &ApprovalRuleBuilder, next_id: i64, depth: usize, visited: &mut usize) {
        *visited += 1;

        let expected: Vec<u32> = (1..=builder.normal_approvers().len() as u32).collect();
        assert_eq!(sequences(builder), expected);
        let mut unique = sorted_ids(builder);
        unique.dedup();
        assert_eq!(unique.len(), builder.normal_approvers().len());

        if depth == 0 {
            return;
        }

        for op in 0..OPERATIONS {
            let mut next = builder.clone();
            let before = next.normal_approvers().to_vec();

            match apply(&mut next, op, next_id) {
                Err(_) => assert_eq!(next.normal_approvers(), &before[..]),
                Ok(()) if op >= 4 => assert_eq!(sorted_ids(&next), sorted_ids(builder)),
                Ok(()) => {}
            }

            let next_id = if op == 0 { next_id + 1 } else { next_id };
            explore(&next, next_id, depth - 1, visited);
        }
    }

    #[test]
    fn test_sequences_stay_contiguous_for_every_edit_sequence() {
        let depth = 6;
        let mut visited = 0;
        explore(&ApprovalRuleBuilder::new(), 100, depth, &mut visited);

        // One state per node of the full operation tree.
        let expected: usize = (0..=depth as u32).map(|d| OPERATIONS.pow(d)).sum();
        assert_eq!(visited, expected);
    }
}
