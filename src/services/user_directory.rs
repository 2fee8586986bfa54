//! Typed lookup over the company's user list.

use crate::error::AppError;
use crate::models::{Approver, DirectoryUser, UserRole};

/// Users of the signed-in admin's company, as fetched from the backend.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<DirectoryUser>,
}

impl UserDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[DirectoryUser] {
        &self.users
    }

    pub fn lookup(&self, user_id: i64) -> Option<&DirectoryUser> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    /// Resolve a user into an approver, or `None` if the id is unknown.
    pub fn approver(&self, user_id: i64) -> Option<Approver> {
        self.lookup(user_id).map(|u| Approver {
            user_id: u.user_id,
            display_name: u.name.clone(),
        })
    }

    /// Users that can be set as someone's manager.
    pub fn managers(&self) -> impl Iterator<Item = &DirectoryUser> {
        self.users
            .iter()
            .filter(|u| matches!(u.role, UserRole::Manager | UserRole::Admin))
    }

    /// Check that `manager_id`, when given, names a manager or admin.
    pub fn check_manager(&self, manager_id: Option<i64>) -> Result<(), AppError> {
        match manager_id {
            None => Ok(()),
            Some(id) if self.managers().any(|u| u.user_id == id) => Ok(()),
            Some(id) => Err(AppError::not_found_with_id("Manager", id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new(vec![
            DirectoryUser {
                user_id: 1,
                name: "Ana".to_string(),
                role: UserRole::Admin,
            },
            DirectoryUser {
                user_id: 2,
                name: "Ben".to_string(),
                role: UserRole::Employee,
            },
            DirectoryUser {
                user_id: 3,
                name: "Cleo".to_string(),
                role: UserRole::Manager,
            },
        ])
    }

    #[test]
    fn test_approver_lookup() {
        let dir = directory();
        assert_eq!(
            dir.approver(2),
            Some(Approver {
                user_id: 2,
                display_name: "Ben".to_string()
            })
        );
        assert_eq!(dir.approver(99), None);
    }

    #[test]
    fn test_managers_filter() {
        let dir = directory();
        let ids: Vec<i64> = dir.managers().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_check_manager() {
        let dir = directory();
        assert!(dir.check_manager(None).is_ok());
        assert!(dir.check_manager(Some(1)).is_ok());
        assert!(dir.check_manager(Some(3)).is_ok());

        for id in [2, 99] {
            match dir.check_manager(Some(id)) {
                Err(AppError::NotFound { resource, id: Some(got) }) => {
                    assert_eq!(resource, "Manager");
                    assert_eq!(got, id.to_string());
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_directory_from_api_payload() {
        let json = r#"[{"user_id": 8, "name": "Dev", "role": "Employee", "email": "dev@example.com"}]"#;
        let users: Vec<DirectoryUser> = serde_json::from_str(json).unwrap();
        let dir = UserDirectory::new(users);
        assert_eq!(dir.len(), 1);
        assert!(dir.lookup(8).is_some());
    }
}
