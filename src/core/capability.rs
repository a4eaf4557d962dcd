//! Role capabilities and region scoping
//!
//! Which role may trigger which lifecycle operation is decided here and
//! nowhere else. The lifecycle manager consults [`ensure_permitted`] before
//! looking at any transfer.

use crate::types::{Actor, Region, Role, TransferError};

/// Mutating operations on the transfer table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTransfer,
    Pickup,
    RouteToWarehouse,
    ConfirmReceipt,
}

impl Operation {
    /// Verb used in error messages and logs
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::CreateTransfer => "create",
            Operation::Pickup => "pick up",
            Operation::RouteToWarehouse => "route to warehouse",
            Operation::ConfirmReceipt => "confirm receipt of",
        }
    }
}

/// Role -> permitted operations
///
/// Supervisors, managers and owners only read.
const CAPABILITIES: &[(Role, &[Operation])] = &[
    (
        Role::Branch,
        &[Operation::CreateTransfer, Operation::ConfirmReceipt],
    ),
    (Role::Driver, &[Operation::Pickup, Operation::RouteToWarehouse]),
    (Role::Supervisor, &[]),
    (Role::Manager, &[]),
    (Role::Owner, &[]),
];

/// Whether `role` may perform `operation`
pub fn permits(role: Role, operation: Operation) -> bool {
    CAPABILITIES
        .iter()
        .find(|(r, _)| *r == role)
        .is_some_and(|(_, ops)| ops.contains(&operation))
}

/// Reject `operation` on `transfer_id` unless the actor's role allows it
pub fn ensure_permitted(
    actor: &Actor,
    operation: Operation,
    transfer_id: &str,
) -> Result<(), TransferError> {
    if permits(actor.role, operation) {
        Ok(())
    } else {
        Err(TransferError::invalid_transition(
            transfer_id,
            operation.verb(),
            &format!("not permitted for role {}", actor.role),
        ))
    }
}

/// Branch-code prefix scoping a driver's or supervisor's visibility
///
/// A region without a prefix is a configuration error rather than a
/// wildcard.
pub fn region_prefix(actor: &Actor) -> Result<&'static str, TransferError> {
    Region::from_name(&actor.region)
        .map(|region| region.prefix())
        .ok_or_else(|| TransferError::unknown_region(&actor.region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Branch, Operation::CreateTransfer, true)]
    #[case(Role::Branch, Operation::ConfirmReceipt, true)]
    #[case(Role::Branch, Operation::Pickup, false)]
    #[case(Role::Branch, Operation::RouteToWarehouse, false)]
    #[case(Role::Driver, Operation::Pickup, true)]
    #[case(Role::Driver, Operation::RouteToWarehouse, true)]
    #[case(Role::Driver, Operation::CreateTransfer, false)]
    #[case(Role::Driver, Operation::ConfirmReceipt, false)]
    #[case(Role::Supervisor, Operation::Pickup, false)]
    #[case(Role::Manager, Operation::CreateTransfer, false)]
    #[case(Role::Owner, Operation::ConfirmReceipt, false)]
    fn test_capability_table(
        #[case] role: Role,
        #[case] operation: Operation,
        #[case] expected: bool,
    ) {
        assert_eq!(permits(role, operation), expected);
    }

    #[test]
    fn test_every_role_has_an_entry() {
        for role in [
            Role::Branch,
            Role::Driver,
            Role::Supervisor,
            Role::Manager,
            Role::Owner,
        ] {
            assert!(CAPABILITIES.iter().any(|(r, _)| *r == role));
        }
    }

    #[test]
    fn test_ensure_permitted_reports_role() {
        let actor = Actor::new("boss", Role::Owner, "Riyadh");
        let err = ensure_permitted(&actor, Operation::Pickup, "T1").unwrap_err();
        assert_eq!(
            err,
            TransferError::invalid_transition("T1", "pick up", "not permitted for role Owner")
        );
    }

    #[rstest]
    #[case("Riyadh", "P00")]
    #[case("qassim", "P03")]
    #[case("Meccah", "P04")]
    fn test_region_prefix(#[case] region: &str, #[case] expected: &str) {
        let actor = Actor::new("d1", Role::Driver, region);
        assert_eq!(region_prefix(&actor).unwrap(), expected);
    }

    #[test]
    fn test_region_prefix_unmapped_region_is_an_error() {
        let actor = Actor::new("d1", Role::Driver, "Dammam");
        assert_eq!(
            region_prefix(&actor).unwrap_err(),
            TransferError::unknown_region("Dammam")
        );
    }
}
