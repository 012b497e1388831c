//! Ordering and implication rules of access levels.
//!
//! Level semantics are only ever expressed here: other modules compare levels
//! and derive implied levels through these functions.
use std::cmp::Ordering;

use sojobo_models::AccessLevel;
use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::ScopeKind;


/// Compare two levels of the given scope kind.
///
/// # Panics
/// If either level does not belong to `kind`.
pub fn compare(a: AccessLevel, b: AccessLevel, kind: ScopeKind) -> Ordering {
    match (a, b, kind) {
        (AccessLevel::Controller(a), AccessLevel::Controller(b), ScopeKind::Controller) => a.cmp(&b),
        (AccessLevel::Model(a), AccessLevel::Model(b), ScopeKind::Model) => a.cmp(&b),
        (a, b, kind) => panic!(
            "cannot compare {} level '{}' with {} level '{}' as {} levels",
            a.kind(), a, b.kind(), b, kind
        ),
    }
}

/// Model level implied on every model of a controller by a controller level.
pub fn implies_model_level(level: ControllerLevel) -> Option<ModelLevel> {
    match level {
        ControllerLevel::Superuser => Some(ModelLevel::Admin),
        _ => None,
    }
}

/// Levels that must be revoked to move from `current` down to `desired`, highest first.
///
/// These are the levels strictly above `desired` and up to, including, `current`.
pub fn revocations<L>(ladder: &[L], current: L, desired: L) -> Vec<L>
    where L: Copy + Ord,
{
    ladder.iter()
        .rev()
        .filter(|level| **level > desired && **level <= current)
        .cloned()
        .collect()
}
