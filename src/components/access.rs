//! Endpoints to inspect and change access to controllers and models.
use iron::Handler;
use iron::IronResult;
use iron::Request;
use iron::Response;
use iron::Set;
use iron::status;
use iron_json_response::JsonResponse;

use slog::Logger;

use sojobo_models::AccessLevel;
use sojobo_models::Scope;
use sojobo_models::ScopeKind;

use super::super::ErrorKind;
use super::super::Result;
use super::super::access::AccessResolver;
use super::super::access::Gate;
use super::super::access::GrantDiff;
use super::super::access::Operation;
use super::super::access::TransitionEngine;
use super::super::interfaces::Interfaces;
use super::super::interfaces::api::APIVersion;
use super::request;


/// Component to mount access endpoints.
pub struct Access {}

impl Access {
    /// Create a new component and mount all access endpoints.
    pub fn new(
        resolver: AccessResolver, engine: TransitionEngine, logger: Logger,
        interfaces: &mut Interfaces
    ) -> Access {
        let show = ShowAccess { resolver: resolver.clone() };
        let set = UserAccess {
            change: Change::Set,
            engine: engine.clone(),
            logger: logger.clone(),
            resolver: resolver.clone(),
        };
        let remove = UserAccess {
            change: Change::Remove,
            engine,
            logger,
            resolver,
        };

        let mut router = interfaces.api.router_for(APIVersion::V1);
        router.get("/controllers/:controller", show.clone(), "/controller");
        router.get("/controllers/:controller/models/:model", show, "/model");
        router.put("/controllers/:controller/users/:user", set.clone(), "/controller/user/set");
        router.delete(
            "/controllers/:controller/users/:user", remove.clone(), "/controller/user/remove"
        );
        router.put(
            "/controllers/:controller/models/:model/users/:user", set, "/model/user/set"
        );
        router.delete(
            "/controllers/:controller/models/:model/users/:user", remove, "/model/user/remove"
        );
        Access {}
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


/// Caller's access context (`/controllers/:controller[/models/:model]`) handler.
#[derive(Clone)]
struct ShowAccess {
    resolver: AccessResolver,
}

impl Handler for ShowAccess {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let scope = request::scope(req)?;
        let context = request::authenticate(req, &self.resolver, Some(&scope))?;
        let operation = match scope.kind() {
            ScopeKind::Controller => Operation::ViewController,
            ScopeKind::Model => Operation::ViewModel,
        };
        Gate::allow(&context, operation)?;
        let mut resp = Response::new();
        resp.set_mut(JsonResponse::json(context)).set_mut(status::Ok);
        Ok(resp)
    }
}


/// Requested change to a user's access.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum Change {
    /// Move the user to the level in the request body.
    Set,

    /// Move the user to no access.
    Remove,
}


/// Request body to set a user's access.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
struct AccessRequest {
    access: String,
}


/// Outcome of an access change.
#[derive(Clone, Debug, Serialize)]
struct AccessChange {
    user: String,
    scope: Scope,
    access: AccessLevel,
    applied: GrantDiff,
}


/// Set or remove a user's access (`/controllers/:controller[/models/:model]/users/:user`) handler.
#[derive(Clone)]
struct UserAccess {
    change: Change,
    engine: TransitionEngine,
    logger: Logger,
    resolver: AccessResolver,
}

impl Handler for UserAccess {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let scope = request::scope(req)?;
        let user = request::param(req, "user")?;
        let context = request::authenticate(req, &self.resolver, Some(&scope))?;
        Gate::allow(&context, self.operation(scope.kind()))?;

        let desired = self.desired(req, scope.kind())?;
        let applied = self.engine.plan_and_apply(&scope, &user, desired)?;
        info!(
            self.logger, "User access changed";
            "user" => &user, "scope" => %scope, "level" => %desired,
            "by" => context.username(), "steps" => applied.len()
        );
        let change = AccessChange {
            user,
            scope,
            access: desired,
            applied,
        };
        let mut resp = Response::new();
        resp.set_mut(JsonResponse::json(change)).set_mut(status::Ok);
        Ok(resp)
    }
}

impl UserAccess {
    fn operation(&self, kind: ScopeKind) -> Operation {
        match (kind, self.change) {
            (ScopeKind::Controller, Change::Set) => Operation::AddControllerUser,
            (ScopeKind::Controller, Change::Remove) => Operation::RemoveControllerUser,
            (ScopeKind::Model, Change::Set) => Operation::AddModelUser,
            (ScopeKind::Model, Change::Remove) => Operation::RemoveModelUser,
        }
    }

    fn desired(&self, req: &mut Request, kind: ScopeKind) -> Result<AccessLevel> {
        match self.change {
            Change::Remove => Ok(AccessLevel::none(kind)),
            Change::Set => {
                let body: AccessRequest = request::body(req)?;
                AccessLevel::parse(kind, &body.access)
                    .map_err(|error| ErrorKind::InvalidRequest(error.to_string()).into())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use iron::Headers;
    use iron::status;
    use iron_test::request;
    use iron_test::response;

    use serde_json;
    use serde_json::Value;

    use sojobo_juju_client::InnerAuthority;
    use sojobo_juju_client::mock::MockAuthority;
    use sojobo_juju_client::mock::MockCall;
    use sojobo_models::AccessLevel;
    use sojobo_models::ControllerLevel;
    use sojobo_models::ModelLevel;
    use sojobo_models::Scope;

    use super::super::tests::headers;
    use super::super::tests::mock_chain;

    fn grant<L: Into<AccessLevel>>(mock: &MockAuthority, user: &str, scope: &Scope, level: L) {
        mock.grant(user, scope, level.into()).unwrap();
    }

    fn body(response: ::iron::Response) -> Value {
        let body = response::extract_body_to_string(response);
        serde_json::from_str(&body).unwrap()
    }

    #[test]
    fn show_controller_context() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        mock.add_login("alice", "pa55");
        mock.set_access("alice", &Scope::for_controller("lab"), &[
            AccessLevel::Controller(ControllerLevel::Login),
        ]);
        let response = request::get(
            "http://host:16016/api/v1/controllers/lab", headers("alice", "pa55"), &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::Ok));
        let body = body(response);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["controller"]["name"], "lab");
        assert_eq!(body["controller"]["access"], "login");
        assert_eq!(body["platform_admin"], false);
    }

    #[test]
    fn show_model_context_of_superuser() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "db");
        mock.add_login("alice", "pa55");
        grant(&mock, "alice", &Scope::for_controller("lab"), ControllerLevel::Superuser);
        let response = request::get(
            "http://host:16016/api/v1/controllers/lab/models/db", headers("alice", "pa55"), &chain
        ).unwrap();
        let body = body(response);
        assert_eq!(body["model"]["name"], "db");
        assert_eq!(body["model"]["access"], "admin");
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        let response = request::get(
            "http://host:16016/api/v1/controllers/lab", Headers::new(), &chain
        );
        let response = match response {
            Err(error) => error.response,
            Ok(_) => panic!("Request should fail"),
        };
        assert_eq!(response.status, Some(status::Unauthorized));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn unknown_controller_is_not_found() {
        let (chain, mock) = mock_chain();
        mock.add_login("alice", "pa55");
        let response = request::get(
            "http://host:16016/api/v1/controllers/prod", headers("alice", "pa55"), &chain
        );
        let response = match response {
            Err(error) => error.response,
            Ok(_) => panic!("Request should fail"),
        };
        assert_eq!(response.status, Some(status::NotFound));
        assert_eq!(body(response)["kind"], "NotFound");
    }

    #[test]
    fn model_admin_grants_write() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "db");
        mock.add_login("alice", "pa55");
        let controller = Scope::for_controller("lab");
        let model = Scope::for_model("lab", "db");
        grant(&mock, "alice", &controller, ControllerLevel::Login);
        grant(&mock, "alice", &model, ModelLevel::Admin);
        mock.reset_calls();

        let response = request::put(
            "http://host:16016/api/v1/controllers/lab/models/db/users/bob",
            headers("alice", "pa55"), r#"{"access": "write"}"#, &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::Ok));
        let body = body(response);
        assert_eq!(body["access"], "write");
        assert_eq!(body["applied"].as_array().unwrap().len(), 2);
        assert_eq!(mock.changes(), vec![
            MockCall::Grant(
                String::from("bob"), controller, AccessLevel::Controller(ControllerLevel::Login)
            ),
            MockCall::Grant(String::from("bob"), model.clone(), AccessLevel::Model(ModelLevel::Write)),
        ]);
        assert_eq!(mock.held("bob", &model), vec![
            AccessLevel::Model(ModelLevel::Read),
            AccessLevel::Model(ModelLevel::Write),
        ]);
    }

    #[test]
    fn model_reader_cannot_grant() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "db");
        mock.add_login("alice", "pa55");
        grant(&mock, "alice", &Scope::for_controller("lab"), ControllerLevel::Login);
        grant(&mock, "alice", &Scope::for_model("lab", "db"), ModelLevel::Read);

        let response = request::put(
            "http://host:16016/api/v1/controllers/lab/models/db/users/bob",
            headers("alice", "pa55"), r#"{"access": "write"}"#, &chain
        );
        let response = match response {
            Err(error) => error.response,
            Ok(_) => panic!("Request should fail"),
        };
        assert_eq!(response.status, Some(status::Forbidden));
        assert!(mock.changes().is_empty());
    }

    #[test]
    fn invalid_level_is_rejected() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        let response = request::put(
            "http://host:16016/api/v1/controllers/lab/users/bob",
            headers("admin", "adm1n"), r#"{"access": "write"}"#, &chain
        );
        let response = match response {
            Err(error) => error.response,
            Ok(_) => panic!("Request should fail"),
        };
        assert_eq!(response.status, Some(status::BadRequest));
        assert_eq!(body(response)["kind"], "InvalidRequest");
        assert!(mock.changes().is_empty());
    }

    #[test]
    fn superuser_removes_controller_user() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        mock.add_login("alice", "pa55");
        let controller = Scope::for_controller("lab");
        grant(&mock, "alice", &controller, ControllerLevel::Superuser);
        grant(&mock, "bob", &controller, ControllerLevel::AddModel);
        mock.reset_calls();

        let response = request::delete(
            "http://host:16016/api/v1/controllers/lab/users/bob", headers("alice", "pa55"), &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::Ok));
        assert_eq!(mock.changes(), vec![
            MockCall::Revoke(
                String::from("bob"), controller.clone(),
                AccessLevel::Controller(ControllerLevel::AddModel)
            ),
            MockCall::Revoke(
                String::from("bob"), controller.clone(),
                AccessLevel::Controller(ControllerLevel::Login)
            ),
        ]);
        assert!(mock.held("bob", &controller).is_empty());
    }
}
