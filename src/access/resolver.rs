use slog::Logger;

use sojobo_juju_client::Authority;

use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;
use sojobo_models::ScopeKind;

use super::super::Error;
use super::super::ErrorKind;
use super::super::Result;

use super::directory;
use super::lattice::implies_model_level;
use super::metrics::RESOLVE_DENIED_COUNT;
use super::AccessContext;
use super::Identity;
use super::IdentityVerifier;


/// Builds the `AccessContext` of requests from the authority's records.
///
/// Resolution only reads from the authority so it is safe to repeat
/// and to run concurrently.
#[derive(Clone)]
pub struct AccessResolver {
    authority: Authority,
    logger: Logger,
    verifier: IdentityVerifier,
}

impl AccessResolver {
    pub fn new(authority: Authority, verifier: IdentityVerifier, logger: Logger) -> AccessResolver {
        AccessResolver {
            authority,
            logger,
            verifier,
        }
    }

    /// Verify the request identity and resolve its access to `scope`.
    ///
    /// Scopes are checked for existence before any access lookup so that missing
    /// controllers and models are always reported as such.
    pub fn authenticate(
        &self, api_key: &str, identity: &Identity, scope: Option<&Scope>
    ) -> Result<AccessContext> {
        let platform_admin = self.verifier.verify(api_key, identity)
            .map_err(|error| self.denied("authentication", error))?;
        if platform_admin {
            return Ok(AccessContext::platform_admin(identity.username(), scope));
        }

        let scope = match scope {
            None => return Ok(AccessContext::user(identity.username(), None, None)),
            Some(scope) => scope,
        };
        let controller = scope.controller_name();
        let controller_scope = Scope::for_controller(controller);
        if !directory::scope_exists(&self.authority, &controller_scope)? {
            let error = ErrorKind::NotFound(ScopeKind::Controller, controller.to_string()).into();
            return Err(self.denied("not-found", error));
        }
        if scope.kind() == ScopeKind::Model && !directory::scope_exists(&self.authority, scope)? {
            let error = ErrorKind::NotFound(ScopeKind::Model, scope.to_string()).into();
            return Err(self.denied("not-found", error));
        }

        let user = identity.username();
        let controller_level = directory::controller_level(&self.authority, user, controller)?
            .unwrap_or(ControllerLevel::None);
        if controller_level == ControllerLevel::None {
            let error = ErrorKind::Authorization(controller_scope.to_string()).into();
            return Err(self.denied("authorization", error));
        }
        let resolved_controller = Some((controller.to_string(), controller_level));

        let model = match scope.model_name() {
            None => return Ok(AccessContext::user(user, resolved_controller, None)),
            Some(model) => model,
        };
        let model_level = match implies_model_level(controller_level) {
            Some(implied) => implied,
            None => directory::model_level(&self.authority, user, controller, model)?
                .unwrap_or(ModelLevel::None),
        };
        if model_level == ModelLevel::None {
            let error = ErrorKind::Authorization(scope.to_string()).into();
            return Err(self.denied("authorization", error));
        }
        let resolved_model = Some((model.to_string(), model_level));
        Ok(AccessContext::user(user, resolved_controller, resolved_model))
    }

    fn denied(&self, reason: &'static str, error: Error) -> Error {
        if let ErrorKind::ExternalCommand(_) = error.kind() {
            return error;
        }
        RESOLVE_DENIED_COUNT.with_label_values(&[reason]).inc();
        debug!(self.logger, "Access resolution denied"; "reason" => reason, "error" => %error);
        error
    }
}
