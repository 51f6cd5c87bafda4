//! Sync operations and the merge policy
//!
//! An [`Operation`] is an intention to reconcile one local path with the
//! remote store. Creates, updates, and renames are all expressed with
//! `Update` plus (for renames) a `Delete` of the old path, so only two
//! kinds exist.
//!
//! The merge policy resolves two conflicting intentions on the same path
//! into one, and is the only place where queue entries are combined:
//!
//! - same kind twice, or nothing pending → the requested kind
//! - pending `Update`, requested `Delete` → `Delete` (a file we were going
//!   to upload can be skipped if it is about to be removed anyway)
//! - pending `Delete`, requested `Update` → `Update` (fresh content
//!   supersedes a pending remote deletion)
//!
//! Operations are idempotent: repeating the same kind on the same path is
//! an overwrite or a no-op on the remote side, which is what makes the
//! engine's at-least-once crash recovery safe.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// An intention to reconcile one local path with the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Upload the path's current local content (creates the remote record
    /// on first success)
    Update,
    /// Remove the path's remote record
    Delete,
}

impl Operation {
    /// Resolve a previously pending operation and a newly requested one
    /// into a single operation for the path
    ///
    /// The match is exhaustive over both kinds, so the undefined-input case
    /// the policy would otherwise have to defend against cannot occur here;
    /// lossy decoding of unknown stored kinds is handled at the storage
    /// boundary instead.
    #[must_use]
    pub fn merge(previous: Option<Operation>, requested: Operation) -> Operation {
        match (previous, requested) {
            (None, requested) => requested,
            (Some(previous), requested) if previous == requested => requested,
            (Some(Operation::Update), Operation::Delete) => Operation::Delete,
            (Some(Operation::Delete), Operation::Update) => Operation::Update,
            // Unreachable: the guards above cover equal kinds and the two
            // cross combinations are matched explicitly.
            (Some(_), requested) => requested,
        }
    }

    /// The wire/storage name of this operation kind
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(DomainError::UnknownOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_no_previous_returns_requested() {
        assert_eq!(Operation::merge(None, Operation::Update), Operation::Update);
        assert_eq!(Operation::merge(None, Operation::Delete), Operation::Delete);
    }

    #[test]
    fn test_merge_same_kind_returns_requested() {
        assert_eq!(
            Operation::merge(Some(Operation::Update), Operation::Update),
            Operation::Update
        );
        assert_eq!(
            Operation::merge(Some(Operation::Delete), Operation::Delete),
            Operation::Delete
        );
    }

    #[test]
    fn test_merge_delete_beats_pending_update() {
        assert_eq!(
            Operation::merge(Some(Operation::Update), Operation::Delete),
            Operation::Delete
        );
    }

    #[test]
    fn test_merge_update_beats_pending_delete() {
        assert_eq!(
            Operation::merge(Some(Operation::Delete), Operation::Update),
            Operation::Update
        );
    }

    #[test]
    fn test_merge_later_request_always_wins() {
        // merge(merge(x, a), b) == merge(x, b) for every combination: the
        // result only ever depends on the most recent request.
        let kinds = [None, Some(Operation::Update), Some(Operation::Delete)];
        let ops = [Operation::Update, Operation::Delete];

        for x in kinds {
            for a in ops {
                for b in ops {
                    let chained = Operation::merge(Some(Operation::merge(x, a)), b);
                    assert_eq!(chained, Operation::merge(x, b));
                }
            }
        }
    }

    #[test]
    fn test_operation_round_trips_through_str() {
        for op in [Operation::Update, Operation::Delete] {
            let parsed: Operation = op.as_str().parse().unwrap();
            assert_eq!(parsed, op);
        }
    }

    #[test]
    fn test_operation_rejects_unknown_kind() {
        assert!(matches!(
            "upsert".parse::<Operation>(),
            Err(DomainError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_operation_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Operation::Update).unwrap(),
            "\"update\""
        );
        assert_eq!(
            serde_json::from_str::<Operation>("\"delete\"").unwrap(),
            Operation::Delete
        );
    }
}
