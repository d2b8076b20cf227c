/// Resource ownership checks
///
/// Tasks and avatars belong to exactly one user. Every mutating or reading
/// access to an owned resource goes through [`assert_owner`] after the
/// resource has been fetched, so a missing resource (404) stays
/// distinguishable from someone else's resource (403).

use thiserror::Error;

/// Error type for ownership checks
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipError {
    /// The resource belongs to a different user
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Asserts that a resource's owning user is the authenticated caller
///
/// # Errors
///
/// Returns `OwnershipError::NotOwner` when the ids differ.
pub fn assert_owner(owner_id: i64, caller_user_id: i64) -> Result<(), OwnershipError> {
    if owner_id != caller_user_id {
        return Err(OwnershipError::NotOwner);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes() {
        assert!(assert_owner(7, 7).is_ok());
    }

    #[test]
    fn test_non_owner_is_rejected() {
        assert_eq!(assert_owner(7, 8), Err(OwnershipError::NotOwner));
    }
}
