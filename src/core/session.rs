//! Credential check against the user table
//!
//! Produces the explicit [`Actor`] value handed to every core call. There
//! is no stored session; a caller authenticates and then keeps the actor.

use crate::types::{Actor, TransferError, User};

/// Resolve a username/password pair to an actor
///
/// Both fields must match exactly. Passwords are plaintext in the table.
pub fn authenticate(users: &[User], username: &str, password: &str) -> Result<Actor, TransferError> {
    users
        .iter()
        .find(|user| user.username == username && user.password == password)
        .map(Actor::from)
        .ok_or_else(|| TransferError::invalid_credentials(username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use rstest::rstest;

    fn users() -> Vec<User> {
        vec![
            User {
                username: "branch1".to_string(),
                password: "pw1".to_string(),
                role: Role::Branch,
                region: "Riyadh".to_string(),
                branch_code: Some("P00-01".to_string()),
            },
            User {
                username: "driver1".to_string(),
                password: "pw2".to_string(),
                role: Role::Driver,
                region: "Riyadh".to_string(),
                branch_code: None,
            },
        ]
    }

    #[test]
    fn test_authenticate_success() {
        let actor = authenticate(&users(), "branch1", "pw1").unwrap();
        assert_eq!(actor.role, Role::Branch);
        assert_eq!(actor.branch(), Some("P00-01"));
    }

    #[rstest]
    #[case::wrong_password("branch1", "pw2")]
    #[case::unknown_user("ghost", "pw1")]
    #[case::case_sensitive("Branch1", "pw1")]
    #[case::empty("", "")]
    fn test_authenticate_failure(#[case] username: &str, #[case] password: &str) {
        let err = authenticate(&users(), username, password).unwrap_err();
        assert_eq!(err, TransferError::invalid_credentials(username));
    }
}
