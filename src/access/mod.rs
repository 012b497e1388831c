//! Access control for controllers and models.
//!
//! Requests are handled in three steps:
//!
//!   1. The `AccessResolver` verifies the caller and builds an immutable `AccessContext`
//!      from the authority's records.
//!   2. The `Gate` checks the context against the operation's requirement.
//!   3. Requests changing access use the `TransitionEngine` to compute and apply
//!      the grant and revoke steps to reach the desired level.
//!
//! Nothing is cached: the authority is the only source of truth.
mod config;
mod context;
mod directory;
mod gate;
mod identity;
mod lattice;
mod metrics;
mod resolver;
mod transition;
mod verifier;

pub use self::config::Config;
pub use self::context::AccessContext;
pub use self::context::Resolved;
pub use self::directory::require_scope;
pub use self::gate::Gate;
pub use self::gate::Operation;
pub use self::gate::Requirement;
pub use self::identity::Identity;
pub use self::lattice::compare;
pub use self::lattice::implies_model_level;
pub use self::metrics::register_metrics;
pub use self::resolver::AccessResolver;
pub use self::transition::plan_controller_transition;
pub use self::transition::plan_model_transition;
pub use self::transition::require_controller_presence;
pub use self::transition::GrantDiff;
pub use self::transition::GrantOp;
pub use self::transition::GrantStep;
pub use self::transition::TransitionEngine;
pub use self::verifier::IdentityVerifier;
