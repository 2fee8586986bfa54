//! Approval rule workflow test.
//!
//! Walks an admin through building a rule the way the form does: pick users
//! from the directory, reorder the chain, drop someone, and submit. Checks the
//! payload that would go to `POST /rules/` at each step.

use expense_desk_lib::error::AppError;
use expense_desk_lib::models::{DirectoryUser, UserRole};
use expense_desk_lib::services::rule_builder::normal_approvers_needed;
use expense_desk_lib::services::{
    ApprovalRuleBuilder, ApproverList, MoveDirection, RuleBuilderError, UserDirectory,
};

fn directory() -> UserDirectory {
    let user = |user_id, name: &str, role| DirectoryUser {
        user_id,
        name: name.to_string(),
        role,
    };
    UserDirectory::new(vec![
        user(1, "Avery", UserRole::Manager),
        user(2, "Blake", UserRole::Manager),
        user(3, "Casey", UserRole::Admin),
        user(4, "Devon", UserRole::Employee),
    ])
}

fn add(builder: &mut ApprovalRuleBuilder, dir: &UserDirectory, list: ApproverList, id: i64) {
    let approver = dir.approver(id).unwrap();
    match list {
        ApproverList::Required => builder
            .add_required(approver.user_id, approver.display_name)
            .unwrap(),
        ApproverList::Normal => builder
            .add_normal(approver.user_id, approver.display_name)
            .unwrap(),
    }
}

fn chain(builder: &ApprovalRuleBuilder) -> Vec<(String, u32)> {
    builder
        .normal_approvers()
        .iter()
        .map(|a| (a.display_name.clone(), a.sequence))
        .collect()
}

#[test]
fn test_reorder_then_remove_keeps_sequence_contiguous() {
    let dir = directory();
    let mut builder = ApprovalRuleBuilder::new();

    for id in [1, 2, 3] {
        add(&mut builder, &dir, ApproverList::Normal, id);
    }

    assert!(builder.move_normal(1, MoveDirection::Up).unwrap());
    assert_eq!(
        chain(&builder),
        vec![
            ("Blake".to_string(), 1),
            ("Avery".to_string(), 2),
            ("Casey".to_string(), 3)
        ]
    );

    let removed = builder.remove_normal(1).unwrap();
    assert_eq!(removed.display_name, "Avery");
    assert_eq!(
        chain(&builder),
        vec![("Blake".to_string(), 1), ("Casey".to_string(), 2)]
    );
}

#[test]
fn test_full_rule_payload() {
    let dir = directory();
    let mut builder = ApprovalRuleBuilder::new();
    builder.set_name("  Travel over 500  ");
    builder.set_description(Some("   ".to_string()));
    builder.set_approval_percentage(75.0).unwrap();

    add(&mut builder, &dir, ApproverList::Required, 3);
    for id in [1, 2, 4] {
        add(&mut builder, &dir, ApproverList::Normal, id);
    }
    builder.move_normal(2, MoveDirection::Down).unwrap();

    builder.validate().unwrap();
    assert_eq!(builder.normal_approvers_needed(), 3);
    assert_eq!(builder.summary(), "1 required, 3/3 normal (75%)");

    let json = serde_json::to_value(builder.to_payload()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Travel over 500",
            "description": "",
            "approval_percentage": 75.0,
            "required_approvers": [{"user_id": 3}],
            "normal_approvers": [
                {"user_id": 1, "sequence": 1},
                {"user_id": 2, "sequence": 2},
                {"user_id": 4, "sequence": 3}
            ]
        })
    );
}

#[test]
fn test_rejected_edits_leave_draft_untouched() {
    let dir = directory();
    let mut builder = ApprovalRuleBuilder::new();
    add(&mut builder, &dir, ApproverList::Normal, 1);
    add(&mut builder, &dir, ApproverList::Normal, 2);
    let before = builder.to_payload();

    let duplicate = builder.add_normal(1, "Avery").unwrap_err();
    assert_eq!(
        duplicate,
        RuleBuilderError::DuplicateApprover {
            user_id: 1,
            list: ApproverList::Normal
        }
    );
    assert!(builder.remove_normal(5).is_err());
    assert!(builder.move_normal(2, MoveDirection::Up).is_err());
    assert!(builder.set_approval_percentage(101.0).is_err());
    assert!(!builder.move_normal(0, MoveDirection::Up).unwrap());
    assert!(!builder.move_normal(1, MoveDirection::Down).unwrap());

    assert_eq!(builder.to_payload(), before);
    assert_eq!(builder.approval_percentage(), 100.0);
}

#[test]
fn test_builder_errors_reach_the_frontend_tagged() {
    let mut builder = ApprovalRuleBuilder::new();
    builder.add_required(9, "Jordan").unwrap();

    let err: AppError = builder.add_required(9, "Jordan").unwrap_err().into();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "RuleBuilder");
    assert_eq!(json["details"]["kind"], "DuplicateApprover");
    assert_eq!(json["details"]["list"], "required");

    let err: AppError = builder.validate().unwrap_err().into();
    assert_eq!(serde_json::to_value(&err).unwrap()["details"]["kind"], "MissingName");
}

#[test]
fn test_reset_then_reuse() {
    let dir = directory();
    let mut builder = ApprovalRuleBuilder::new();
    builder.set_name("Small purchases");
    add(&mut builder, &dir, ApproverList::Required, 1);
    add(&mut builder, &dir, ApproverList::Normal, 2);

    builder.reset();
    let payload = builder.to_payload();
    assert!(payload.required_approvers.is_empty());
    assert!(payload.normal_approvers.is_empty());
    assert_eq!(builder.validate(), Err(RuleBuilderError::NoApprovers));

    add(&mut builder, &dir, ApproverList::Normal, 2);
    assert_eq!(chain(&builder), vec![("Blake".to_string(), 1)]);
}

#[test]
fn test_needed_counts() {
    assert_eq!(normal_approvers_needed(4, 75.0), 3);
    assert_eq!(normal_approvers_needed(3, 50.0), 2);
    assert_eq!(normal_approvers_needed(0, 100.0), 0);
    assert_eq!(normal_approvers_needed(0, 0.0), 0);
    assert_eq!(normal_approvers_needed(5, 0.0), 0);
}
