// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Deletion policy
//!
//! Decides what happens to a volume directory once its volume is released.
//! The policy is derived from storage-class parameters on every deletion and
//! is never persisted.
//!
//! Precedence:
//! 1. `onDelete: delete` removes the directory.
//! 2. `onDelete: retain` leaves it untouched.
//! 3. Any other `onDelete` is ignored. `archiveOnDelete: false` removes the
//!    directory; `true` or an absent key archives it.

use crate::domain::parameters::{parse_bool, ParameterError};
use crate::domain::storage_class::StorageClassParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPolicy {
    /// `onDelete: delete`
    Delete,
    /// `onDelete: retain`
    Retain,
    /// Archive requested explicitly or by default
    ArchiveTrue,
    /// `archiveOnDelete: false`
    ArchiveFalse,
}

/// Filesystem effect a policy resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionAction {
    Remove,
    Keep,
    Archive,
}

impl DeletionPolicy {
    pub fn from_parameters(params: &StorageClassParameters) -> Result<Self, ParameterError> {
        match params.on_delete() {
            Some("delete") => return Ok(Self::Delete),
            Some("retain") => return Ok(Self::Retain),
            _ => {}
        }

        match params.archive_on_delete() {
            Some(value) if !parse_bool(value)? => Ok(Self::ArchiveFalse),
            _ => Ok(Self::ArchiveTrue),
        }
    }

    pub fn action(self) -> DeletionAction {
        match self {
            Self::Delete | Self::ArchiveFalse => DeletionAction::Remove,
            Self::Retain => DeletionAction::Keep,
            Self::ArchiveTrue => DeletionAction::Archive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> StorageClassParameters {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_on_delete_wins_over_archive_flag() {
        let policy =
            DeletionPolicy::from_parameters(&params(&[("onDelete", "retain"), ("archiveOnDelete", "false")]))
                .unwrap();
        assert_eq!(policy, DeletionPolicy::Retain);
        assert_eq!(policy.action(), DeletionAction::Keep);

        let policy =
            DeletionPolicy::from_parameters(&params(&[("onDelete", "delete"), ("archiveOnDelete", "true")]))
                .unwrap();
        assert_eq!(policy, DeletionPolicy::Delete);
        assert_eq!(policy.action(), DeletionAction::Remove);
    }

    #[test]
    fn test_on_delete_wins_even_with_invalid_archive_flag() {
        let policy =
            DeletionPolicy::from_parameters(&params(&[("onDelete", "retain"), ("archiveOnDelete", "maybe")]))
                .unwrap();
        assert_eq!(policy, DeletionPolicy::Retain);
    }

    #[test]
    fn test_archive_false_removes() {
        let policy = DeletionPolicy::from_parameters(&params(&[("archiveOnDelete", "false")])).unwrap();
        assert_eq!(policy, DeletionPolicy::ArchiveFalse);
        assert_eq!(policy.action(), DeletionAction::Remove);
    }

    #[test]
    fn test_defaults_to_archive() {
        let policy = DeletionPolicy::from_parameters(&params(&[])).unwrap();
        assert_eq!(policy, DeletionPolicy::ArchiveTrue);
        assert_eq!(policy.action(), DeletionAction::Archive);

        let policy = DeletionPolicy::from_parameters(&params(&[("archiveOnDelete", "true")])).unwrap();
        assert_eq!(policy, DeletionPolicy::ArchiveTrue);
    }

    #[test]
    fn test_unknown_on_delete_falls_through() {
        let policy =
            DeletionPolicy::from_parameters(&params(&[("onDelete", "Delete"), ("archiveOnDelete", "0")]))
                .unwrap();
        assert_eq!(policy, DeletionPolicy::ArchiveFalse);

        let policy = DeletionPolicy::from_parameters(&params(&[("onDelete", "shred")])).unwrap();
        assert_eq!(policy, DeletionPolicy::ArchiveTrue);
    }

    #[test]
    fn test_unparsable_archive_flag_is_rejected() {
        let result = DeletionPolicy::from_parameters(&params(&[("archiveOnDelete", "sometimes")]));
        assert_eq!(result, Err(ParameterError::InvalidBool("sometimes".to_string())));
    }
}
