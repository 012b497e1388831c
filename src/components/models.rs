//! Endpoints to create and destroy models.
use iron::Handler;
use iron::IronResult;
use iron::Request;
use iron::Response;
use iron::Set;
use iron::status;
use iron_json_response::JsonResponse;

use slog::Logger;

use sojobo_juju_client::Authority;
use sojobo_models::AccessLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;
use sojobo_models::ScopeKind;

use super::super::ErrorKind;
use super::super::Result;
use super::super::ResultExt;
use super::super::access;
use super::super::access::AccessResolver;
use super::super::access::Gate;
use super::super::access::GrantDiff;
use super::super::access::Operation;
use super::super::access::TransitionEngine;
use super::super::interfaces::Interfaces;
use super::super::interfaces::api::APIVersion;
use super::request;


/// Component to mount model management endpoints.
pub struct Models {}

impl Models {
    /// Create a new component and mount all model endpoints.
    pub fn new(
        resolver: AccessResolver, engine: TransitionEngine, logger: Logger,
        interfaces: &mut Interfaces
    ) -> Models {
        let create = CreateModel {
            authority: interfaces.authority.clone(),
            engine,
            logger: logger.clone(),
            resolver: resolver.clone(),
        };
        let delete = DeleteModel {
            authority: interfaces.authority.clone(),
            logger,
            resolver,
        };
        let mut router = interfaces.api.router_for(APIVersion::V1);
        router.put("/controllers/:controller/models/:model", create, "/model/create");
        router.delete("/controllers/:controller/models/:model", delete, "/model/delete");
        Models {}
    }

    /// Noop method for standard interface.
    pub fn run(&self) -> Result<()> {
        Ok(())
    }

    /// Noop method for standard interface.
    pub fn wait(&self) -> Result<()> {
        Ok(())
    }
}


/// Details of a newly created model.
#[derive(Clone, Debug, Serialize)]
struct CreatedModel {
    scope: Scope,
    owner: String,
    applied: GrantDiff,
}


/// Model creation (`PUT /controllers/:controller/models/:model`) handler.
///
/// The caller is made admin of the new model.
struct CreateModel {
    authority: Authority,
    engine: TransitionEngine,
    logger: Logger,
    resolver: AccessResolver,
}

impl Handler for CreateModel {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let controller = request::param(req, "controller")?;
        let model = request::param(req, "model")?;
        let parent = Scope::for_controller(controller.as_str());
        let context = request::authenticate(req, &self.resolver, Some(&parent))?;
        Gate::allow(&context, Operation::CreateModel)?;
        access::require_scope(&self.authority, &parent)?;

        let scope = Scope::for_model(controller.as_str(), model.as_str());
        let created = self.create(scope, context.username(), context.is_platform_admin())?;
        let mut resp = Response::new();
        resp.set_mut(JsonResponse::json(created)).set_mut(status::Created);
        Ok(resp)
    }
}

impl CreateModel {
    fn create(&self, scope: Scope, owner: &str, platform_admin: bool) -> Result<CreatedModel> {
        let controller = scope.controller_name();
        let model = scope.model_name().unwrap_or_default();
        let exists = self.authority.scope_exists(&scope)
            .chain_err(|| ErrorKind::ExternalCommand(format!("scope_exists {}", scope)))?;
        if exists {
            return Err(ErrorKind::AlreadyExists(ScopeKind::Model, scope.to_string()).into());
        }

        info!(self.logger, "Creating model"; "scope" => %scope, "owner" => owner);
        self.authority.create_model(controller, model)
            .chain_err(|| ErrorKind::ExternalCommand(format!("create_model {}", scope)))?;

        // The platform identity is the juju admin and owns the model already.
        let applied = if platform_admin {
            GrantDiff::from(Vec::new())
        } else {
            self.engine.plan_and_apply(&scope, owner, AccessLevel::Model(ModelLevel::Admin))?
        };
        Ok(CreatedModel {
            scope,
            owner: String::from(owner),
            applied,
        })
    }
}


/// Model removal (`DELETE /controllers/:controller/models/:model`) handler.
struct DeleteModel {
    authority: Authority,
    logger: Logger,
    resolver: AccessResolver,
}

impl Handler for DeleteModel {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let scope = request::scope(req)?;
        let context = request::authenticate(req, &self.resolver, Some(&scope))?;
        Gate::allow(&context, Operation::DeleteModel)?;
        access::require_scope(&self.authority, &scope)?;

        info!(self.logger, "Destroying model"; "scope" => %scope, "by" => context.username());
        let model = scope.model_name().unwrap_or_default();
        self.authority.destroy_model(scope.controller_name(), model)
            .chain_err(|| ErrorKind::ExternalCommand(format!("destroy_model {}", scope)))?;
        Ok(Response::with(status::NoContent))
    }
}


#[cfg(test)]
mod tests {
    use iron::status;
    use iron_test::request;
    use iron_test::response;

    use serde_json;
    use serde_json::Value;

    use sojobo_juju_client::InnerAuthority;
    use sojobo_juju_client::mock::MockCall;
    use sojobo_models::AccessLevel;
    use sojobo_models::ControllerLevel;
    use sojobo_models::ModelLevel;
    use sojobo_models::Scope;

    use super::super::tests::headers;
    use super::super::tests::mock_chain;

    fn error_response(result: ::iron::IronResult<::iron::Response>) -> ::iron::Response {
        match result {
            Err(error) => error.response,
            Ok(_) => panic!("Request should fail"),
        }
    }

    fn body(response: ::iron::Response) -> Value {
        serde_json::from_str(&response::extract_body_to_string(response)).unwrap()
    }

    #[test]
    fn add_model_user_creates_and_owns_model() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        mock.add_login("alice", "pa55");
        let controller = Scope::for_controller("lab");
        mock.grant("alice", &controller, AccessLevel::Controller(ControllerLevel::AddModel)).unwrap();
        mock.reset_calls();

        let response = request::put(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("alice", "pa55"),
            "", &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::Created));
        let body = body(response);
        assert_eq!(body["owner"], "alice");
        assert_eq!(body["applied"].as_array().unwrap().len(), 1);

        let model = Scope::for_model("lab", "staging");
        assert!(mock.calls().contains(&MockCall::CreateModel(String::from("lab"), String::from("staging"))));
        assert_eq!(mock.changes(), vec![
            MockCall::Grant(String::from("alice"), model.clone(), AccessLevel::Model(ModelLevel::Admin)),
        ]);
        assert_eq!(mock.query_access("alice", &model).unwrap(), Some(AccessLevel::Model(ModelLevel::Admin)));
    }

    #[test]
    fn platform_admin_creates_model_without_grants() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        let response = request::put(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("admin", "adm1n"),
            "", &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::Created));
        assert!(mock.scopes.lock().unwrap().contains(&Scope::for_model("lab", "staging")));
        assert!(mock.changes().is_empty());
    }

    #[test]
    fn login_users_cannot_create_models() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        mock.add_login("alice", "pa55");
        let controller = Scope::for_controller("lab");
        mock.grant("alice", &controller, AccessLevel::Controller(ControllerLevel::Login)).unwrap();
        let response = error_response(request::put(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("alice", "pa55"),
            "", &chain
        ));
        assert_eq!(response.status, Some(status::Forbidden));
        assert!(!mock.scopes.lock().unwrap().contains(&Scope::for_model("lab", "staging")));
    }

    #[test]
    fn existing_model_conflicts() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "staging");
        let response = error_response(request::put(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("admin", "adm1n"),
            "", &chain
        ));
        assert_eq!(response.status, Some(status::Conflict));
        assert_eq!(body(response)["kind"], "AlreadyExists");
        assert!(!mock.calls().contains(&MockCall::CreateModel(String::from("lab"), String::from("staging"))));
    }

    #[test]
    fn create_model_on_unknown_controller() {
        let (chain, mock) = mock_chain();
        let response = error_response(request::put(
            "http://host:16016/api/v1/controllers/prod/models/staging", headers("admin", "adm1n"),
            "", &chain
        ));
        assert_eq!(response.status, Some(status::NotFound));
        assert!(mock.scopes.lock().unwrap().is_empty());
    }

    #[test]
    fn model_admin_deletes_model() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "staging");
        mock.add_login("alice", "pa55");
        let model = Scope::for_model("lab", "staging");
        mock.grant("alice", &Scope::for_controller("lab"), AccessLevel::Controller(ControllerLevel::Login)).unwrap();
        mock.grant("alice", &model, AccessLevel::Model(ModelLevel::Admin)).unwrap();
        let response = request::delete(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("alice", "pa55"), &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::NoContent));
        assert!(mock.calls().contains(&MockCall::DestroyModel(String::from("lab"), String::from("staging"))));
        assert!(!mock.scopes.lock().unwrap().contains(&model));
        assert!(mock.scopes.lock().unwrap().contains(&Scope::for_controller("lab")));
    }

    #[test]
    fn model_writers_cannot_delete_model() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "staging");
        mock.add_login("alice", "pa55");
        let model = Scope::for_model("lab", "staging");
        mock.grant("alice", &Scope::for_controller("lab"), AccessLevel::Controller(ControllerLevel::Login)).unwrap();
        mock.grant("alice", &model, AccessLevel::Model(ModelLevel::Write)).unwrap();
        let response = error_response(request::delete(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("alice", "pa55"), &chain
        ));
        assert_eq!(response.status, Some(status::Forbidden));
        assert!(mock.scopes.lock().unwrap().contains(&model));
    }

    #[test]
    fn delete_unknown_model_is_not_found() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        let response = error_response(request::delete(
            "http://host:16016/api/v1/controllers/lab/models/staging", headers("admin", "adm1n"), &chain
        ));
        assert_eq!(response.status, Some(status::NotFound));
        assert!(!mock.calls().contains(&MockCall::DestroyModel(String::from("lab"), String::from("staging"))));
    }
}
