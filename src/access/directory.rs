//! Typed lookups against the authority's access directory.
use sojobo_juju_client::Authority;

use sojobo_models::AccessLevel;
use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;
use sojobo_models::ScopeKind;

use super::super::ErrorKind;
use super::super::Result;
use super::super::ResultExt;


/// Current controller level of `user`, if the authority has a record of it.
pub fn controller_level(
    authority: &Authority, user: &str, controller: &str
) -> Result<Option<ControllerLevel>> {
    let scope = Scope::for_controller(controller);
    match query(authority, user, &scope)? {
        None => Ok(None),
        Some(AccessLevel::Controller(level)) => Ok(Some(level)),
        Some(level) => Err(unexpected_kind(&scope, level)),
    }
}

/// Current model level of `user`, if the authority has a record of it.
pub fn model_level(
    authority: &Authority, user: &str, controller: &str, model: &str
) -> Result<Option<ModelLevel>> {
    let scope = Scope::for_model(controller, model);
    match query(authority, user, &scope)? {
        None => Ok(None),
        Some(AccessLevel::Model(level)) => Ok(Some(level)),
        Some(level) => Err(unexpected_kind(&scope, level)),
    }
}

/// Check that a controller or model exists.
pub fn scope_exists(authority: &Authority, scope: &Scope) -> Result<bool> {
    let exists = authority.scope_exists(scope)
        .chain_err(|| ErrorKind::ExternalCommand(format!("scope_exists {}", scope)))?;
    Ok(exists)
}

/// Fail with `NotFound` unless a controller or model exists.
pub fn require_scope(authority: &Authority, scope: &Scope) -> Result<()> {
    if scope_exists(authority, scope)? {
        return Ok(());
    }
    let name = match scope.kind() {
        ScopeKind::Controller => String::from(scope.controller_name()),
        ScopeKind::Model => scope.to_string(),
    };
    Err(ErrorKind::NotFound(scope.kind(), name).into())
}

fn query(authority: &Authority, user: &str, scope: &Scope) -> Result<Option<AccessLevel>> {
    let level = authority.query_access(user, scope)
        .chain_err(|| ErrorKind::ExternalCommand(format!("query_access {}", scope)))?;
    Ok(level)
}

fn unexpected_kind(scope: &Scope, level: AccessLevel) -> super::super::Error {
    let operation = format!(
        "query_access {} returned {} level '{}'", scope, level.kind(), level
    );
    ErrorKind::ExternalCommand(operation).into()
}
