use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use slog::Logger;

use sojobo_juju_client::Authority;

use sojobo_models::AccessLevel;
use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;

use super::super::ErrorKind;
use super::super::Result;
use super::super::ResultExt;

use super::directory;
use super::lattice::compare;
use super::lattice::revocations;
use super::metrics::TRANSITION_STEPS_COUNT;
use super::metrics::TRANSITION_STEP_ERRORS_COUNT;


/// Primitive operations exposed by the authority.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantOp {
    Grant,
    Revoke,
}

impl GrantOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantOp::Grant => "grant",
            GrantOp::Revoke => "revoke",
        }
    }
}

impl fmt::Display for GrantOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}


/// A single grant or revoke of a level on a scope.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct GrantStep {
    pub op: GrantOp,
    pub scope: Scope,
    pub level: AccessLevel,
}

impl GrantStep {
    pub fn grant<L: Into<AccessLevel>>(scope: Scope, level: L) -> GrantStep {
        GrantStep {
            op: GrantOp::Grant,
            scope,
            level: level.into(),
        }
    }

    pub fn revoke<L: Into<AccessLevel>>(scope: Scope, level: L) -> GrantStep {
        GrantStep {
            op: GrantOp::Revoke,
            scope,
            level: level.into(),
        }
    }
}

impl fmt::Display for GrantStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})@{}", self.op, self.level, self.scope)
    }
}


/// Ordered steps that move a user from its current level to a desired level.
#[derive(Clone, Default, Eq, PartialEq, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct GrantDiff(Vec<GrantStep>);

impl GrantDiff {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn steps(&self) -> &[GrantStep] {
        &self.0
    }

    /// The diff grants some level on a model.
    fn grants_model_access(&self) -> bool {
        self.0.iter().any(|step| match (step.op, &step.scope) {
            (GrantOp::Grant, Scope::Model { .. }) => true,
            _ => false,
        })
    }
}

impl From<Vec<GrantStep>> for GrantDiff {
    fn from(steps: Vec<GrantStep>) -> GrantDiff {
        GrantDiff(steps)
    }
}


/// Plan the steps to move a user from `current` to `desired` on a controller.
///
/// Users without a record on the controller are at `none`.
pub fn plan_controller_transition(
    controller: &str, current: Option<ControllerLevel>, desired: ControllerLevel
) -> GrantDiff {
    let scope = Scope::for_controller(controller);
    let current = current.unwrap_or(ControllerLevel::None);
    plan_steps(&scope, &ControllerLevel::LADDER, current, desired).into()
}

/// Plan the steps to move a user from `current` to `desired` on a model.
///
/// Users without a record on the model are at `none`.
pub fn plan_model_transition(
    controller: &str, model: &str, current: Option<ModelLevel>, desired: ModelLevel
) -> GrantDiff {
    let scope = Scope::for_model(controller, model);
    let current = current.unwrap_or(ModelLevel::None);
    plan_steps(&scope, &ModelLevel::LADDER, current, desired).into()
}

/// Prepend a `login` grant on the controller to diffs granting model access
/// to users with no presence on the controller.
pub fn require_controller_presence(
    controller: &str, presence: Option<ControllerLevel>, diff: GrantDiff
) -> GrantDiff {
    let present = presence.map(|level| level > ControllerLevel::None).unwrap_or(false);
    if present || !diff.grants_model_access() {
        return diff;
    }
    let mut steps = vec![GrantStep::grant(Scope::for_controller(controller), ControllerLevel::Login)];
    steps.extend(diff.0);
    steps.into()
}

/// Grant up in one step, revoke down one level at a time.
fn plan_steps<L>(scope: &Scope, ladder: &[L], current: L, desired: L) -> Vec<GrantStep>
    where L: Copy + Ord + Into<AccessLevel>,
{
    match compare(desired.into(), current.into(), scope.kind()) {
        Ordering::Equal => Vec::new(),
        Ordering::Greater => vec![GrantStep::grant(scope.clone(), desired)],
        Ordering::Less => revocations(ladder, current, desired).into_iter()
            .map(|level| GrantStep::revoke(scope.clone(), level))
            .collect(),
    }
}


type LockKey = (String, Scope);

/// Computes and applies access changes against the authority.
///
/// The current level is read right before planning and nothing is cached.
/// Changes for the same user and scope are serialised within the process but
/// the authority can still be changed by others between planning and applying.
#[derive(Clone)]
pub struct TransitionEngine {
    authority: Authority,
    locks: Arc<Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>,
    logger: Logger,
}

impl TransitionEngine {
    pub fn new(authority: Authority, logger: Logger) -> TransitionEngine {
        TransitionEngine {
            authority,
            locks: Arc::new(Mutex::new(HashMap::new())),
            logger,
        }
    }

    /// Read the current level of `user` on `scope` and plan the move to `desired`.
    pub fn plan(&self, scope: &Scope, user: &str, desired: AccessLevel) -> Result<GrantDiff> {
        match (scope, desired) {
            (Scope::Controller { controller }, AccessLevel::Controller(desired)) => {
                let current = directory::controller_level(&self.authority, user, controller)?;
                Ok(plan_controller_transition(controller, current, desired))
            }
            (Scope::Model { controller, model }, AccessLevel::Model(desired)) => {
                let current = directory::model_level(&self.authority, user, controller, model)?;
                let diff = plan_model_transition(controller, model, current, desired);
                if !diff.grants_model_access() {
                    return Ok(diff);
                }
                let presence = directory::controller_level(&self.authority, user, controller)?;
                Ok(require_controller_presence(controller, presence, diff))
            }
            (scope, desired) => {
                let reason = format!(
                    "'{}' is not a valid access level for {} '{}'", desired, scope.kind(), scope
                );
                Err(ErrorKind::InvalidRequest(reason).into())
            }
        }
    }

    /// Execute the steps of a diff in order, stopping at the first failure.
    ///
    /// Steps applied before a failure are not rolled back.
    pub fn apply(&self, user: &str, diff: &GrantDiff) -> Result<()> {
        for step in diff.steps() {
            let op = step.op.as_str();
            info!(
                self.logger, "Applying access change";
                "user" => user, "op" => op, "scope" => %step.scope, "level" => %step.level
            );
            TRANSITION_STEPS_COUNT.with_label_values(&[op]).inc();
            let result = match step.op {
                GrantOp::Grant => self.authority.grant(user, &step.scope, step.level),
                GrantOp::Revoke => self.authority.revoke(user, &step.scope, step.level),
            };
            if let Err(error) = result {
                TRANSITION_STEP_ERRORS_COUNT.with_label_values(&[op]).inc();
                return Err(error).chain_err(|| ErrorKind::ExternalCommand(step.to_string()));
            }
        }
        Ok(())
    }

    /// Move `user` to `desired` on `scope` and return the applied diff.
    pub fn plan_and_apply(&self, scope: &Scope, user: &str, desired: AccessLevel) -> Result<GrantDiff> {
        let key = (String::from(user), scope.clone());
        let lock = self.acquire(&key);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.plan(scope, user, desired).and_then(|diff| {
                self.apply(user, &diff)?;
                Ok(diff)
            })
        };
        self.release(&key, lock);
        result
    }

    fn acquire(&self, key: &LockKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(key.clone()).or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(lock)
    }

    /// Drop the lock for a key once no request holds it.
    fn release(&self, key: &LockKey, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        let idle = locks.get(key).map(|entry| Arc::strong_count(entry) == 1).unwrap_or(false);
        if idle {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}
