//! Per-operation access policy.
//!
//! `Operation::requirement` is the only place where the level needed
//! by each operation is defined.
use std::cmp::Ordering;

use sojobo_models::AccessLevel;
use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::ScopeKind;

use super::super::ErrorKind;
use super::super::Result;

use super::lattice::compare;
use super::AccessContext;


/// Minimum access needed to perform an operation.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Requirement {
    /// Only the platform service identity is allowed.
    PlatformAdmin,

    /// At least the given level on the request's controller.
    Controller(ControllerLevel),

    /// At least the given level on the request's model.
    Model(ModelLevel),
}


/// Privileged operations exposed to users.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Operation {
    AddControllerUser,
    AddModelUser,
    CreateController,
    CreateModel,
    DeleteController,
    DeleteModel,
    RemoveControllerUser,
    RemoveModelUser,
    ViewController,
    ViewModel,
}

impl Operation {
    pub fn requirement(self) -> Requirement {
        match self {
            Operation::CreateController => Requirement::PlatformAdmin,

            Operation::AddControllerUser => Requirement::Controller(ControllerLevel::Superuser),
            Operation::CreateModel => Requirement::Controller(ControllerLevel::AddModel),
            Operation::DeleteController => Requirement::Controller(ControllerLevel::Superuser),
            Operation::RemoveControllerUser => Requirement::Controller(ControllerLevel::Superuser),
            Operation::ViewController => Requirement::Controller(ControllerLevel::Login),

            Operation::AddModelUser => Requirement::Model(ModelLevel::Admin),
            Operation::DeleteModel => Requirement::Model(ModelLevel::Admin),
            Operation::RemoveModelUser => Requirement::Model(ModelLevel::Admin),
            Operation::ViewModel => Requirement::Model(ModelLevel::Read),
        }
    }
}


/// Allow or deny operations based on a resolved `AccessContext`.
pub struct Gate;

impl Gate {
    /// Check that the context meets the operation's requirement.
    pub fn allow(context: &AccessContext, operation: Operation) -> Result<()> {
        Gate::check(context, operation.requirement())
    }

    /// Check that the context meets a requirement.
    ///
    /// # Panics
    /// If the requirement is about a scope that was not resolved for the context.
    pub fn check(context: &AccessContext, requirement: Requirement) -> Result<()> {
        let (allowed, scope) = match requirement {
            Requirement::PlatformAdmin => (context.is_platform_admin(), String::from("platform")),
            Requirement::Controller(required) => {
                let controller = context.controller()
                    .unwrap_or_else(|| panic!("cannot check controller access without a controller"));
                let held = AccessLevel::Controller(controller.access);
                let ordering = compare(held, required.into(), ScopeKind::Controller);
                (ordering != Ordering::Less, controller.name.clone())
            }
            Requirement::Model(required) => {
                let model = context.model()
                    .unwrap_or_else(|| panic!("cannot check model access without a model"));
                let held = AccessLevel::Model(model.access);
                let ordering = compare(held, required.into(), ScopeKind::Model);
                let scope = match context.controller() {
                    Some(controller) => format!("{}:{}", controller.name, model.name),
                    None => model.name.clone(),
                };
                (ordering != Ordering::Less, scope)
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(ErrorKind::Authorization(scope).into())
        }
    }
}
