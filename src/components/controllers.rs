//! Endpoint to create controllers on supported clouds.
use iron::Handler;
use iron::IronResult;
use iron::Request;
use iron::Response;
use iron::Set;
use iron::status;
use iron_json_response::JsonResponse;

use slog::Logger;

use sojobo_juju_client::Authority;
use sojobo_models::Scope;
use sojobo_models::ScopeKind;

use super::super::ErrorKind;
use super::super::Result;
use super::super::ResultExt;
use super::super::access;
use super::super::access::AccessResolver;
use super::super::access::Gate;
use super::super::access::Operation;
use super::super::clouds::CloudRegistry;
use super::super::interfaces::Interfaces;
use super::super::interfaces::api::APIVersion;
use super::request;


/// Component to mount controller management endpoints.
pub struct Controllers {}

impl Controllers {
    /// Create a new component and mount all controller endpoints.
    pub fn new(
        resolver: AccessResolver, clouds: CloudRegistry, logger: Logger,
        interfaces: &mut Interfaces
    ) -> Controllers {
        let create = CreateController {
            authority: interfaces.authority.clone(),
            clouds,
            logger: logger.clone(),
            resolver: resolver.clone(),
        };
        let delete = DeleteController {
            authority: interfaces.authority.clone(),
            logger,
            resolver,
        };
        let mut router = interfaces.api.router_for(APIVersion::V1);
        router.post("/controllers/:controller", create, "/controller/create");
        router.delete("/controllers/:controller", delete, "/controller/delete");
        Controllers {}
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


/// Request body to create a controller.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
struct CreateRequest {
    cloud: String,
    region: String,
    #[serde(default)]
    series: Option<String>,
}


/// Details of a newly created controller.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct CreatedController {
    controller: String,
    cloud: String,
    region: String,
    lxd: bool,
}


/// Controller creation (`POST /controllers/:controller`) handler.
struct CreateController {
    authority: Authority,
    clouds: CloudRegistry,
    logger: Logger,
    resolver: AccessResolver,
}

impl Handler for CreateController {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let controller = request::param(req, "controller")?;
        let context = request::authenticate(req, &self.resolver, None)?;
        Gate::allow(&context, Operation::CreateController)?;

        let body: CreateRequest = request::body(req)?;
        let created = self.create(controller, body)?;
        let mut resp = Response::new();
        resp.set_mut(JsonResponse::json(created)).set_mut(status::Created);
        Ok(resp)
    }
}

impl CreateController {
    fn create(&self, controller: String, body: CreateRequest) -> Result<CreatedController> {
        let cloud = self.clouds.lookup(&body.cloud)?;
        if let Some(series) = body.series.as_ref() {
            if !cloud.supports_series(series) {
                let reason = format!("series '{}' is not available on '{}'", series, cloud.name());
                return Err(ErrorKind::InvalidRequest(reason).into());
            }
        }

        let scope = Scope::for_controller(controller.as_str());
        let exists = self.authority.scope_exists(&scope)
            .chain_err(|| ErrorKind::ExternalCommand(format!("scope_exists {}", scope)))?;
        if exists {
            return Err(ErrorKind::AlreadyExists(ScopeKind::Controller, controller).into());
        }

        info!(
            self.logger, "Creating controller";
            "controller" => &controller, "cloud" => cloud.name(), "region" => &body.region
        );
        let args = cloud.bootstrap_args(&controller, &body.region);
        self.authority.bootstrap(args)
            .chain_err(|| ErrorKind::ExternalCommand(format!("bootstrap {}", controller)))?;
        Ok(CreatedController {
            controller,
            cloud: String::from(cloud.name()),
            region: body.region,
            lxd: cloud.supports_lxd(),
        })
    }
}


/// Controller removal (`DELETE /controllers/:controller`) handler.
struct DeleteController {
    authority: Authority,
    logger: Logger,
    resolver: AccessResolver,
}

impl Handler for DeleteController {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let controller = request::param(req, "controller")?;
        let scope = Scope::for_controller(controller.as_str());
        let context = request::authenticate(req, &self.resolver, Some(&scope))?;
        Gate::allow(&context, Operation::DeleteController)?;
        access::require_scope(&self.authority, &scope)?;

        info!(self.logger, "Destroying controller"; "controller" => &controller, "by" => context.username());
        self.authority.destroy_controller(&controller)
            .chain_err(|| ErrorKind::ExternalCommand(format!("destroy_controller {}", controller)))?;
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
    use sojobo_models::Scope;

    use super::super::tests::headers;
    use super::super::tests::mock_chain;

    fn error_response(result: ::iron::IronResult<::iron::Response>) -> ::iron::Response {
        match result {
            Err(error) => error.response,
            Ok(_) => panic!("Request should fail"),
        }
    }

    #[test]
    fn platform_admin_creates_controller() {
        let (chain, mock) = mock_chain();
        let response = request::post(
            "http://host:16016/api/v1/controllers/lab", headers("admin", "adm1n"),
            r#"{"cloud": "google", "region": "europe-west1"}"#, &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::Created));
        let body: Value = serde_json::from_str(&response::extract_body_to_string(response)).unwrap();
        assert_eq!(body["controller"], "lab");
        assert_eq!(body["lxd"], false);
        let bootstrap = MockCall::Bootstrap(vec![
            String::from("google/europe-west1"), String::from("lab"),
        ]);
        assert!(mock.calls().contains(&bootstrap));
        assert!(mock.scopes.lock().unwrap().contains(&Scope::for_controller("lab")));
    }

    #[test]
    fn existing_controller_conflicts() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        let response = error_response(request::post(
            "http://host:16016/api/v1/controllers/lab", headers("admin", "adm1n"),
            r#"{"cloud": "aws", "region": "eu-west-1"}"#, &chain
        ));
        assert_eq!(response.status, Some(status::Conflict));
        let bootstraps = mock.calls().into_iter()
            .filter(|call| match call {
                MockCall::Bootstrap(_) => true,
                _ => false,
            })
            .count();
        assert_eq!(bootstraps, 0);
    }

    #[test]
    fn unsupported_cloud() {
        let (chain, _) = mock_chain();
        let response = error_response(request::post(
            "http://host:16016/api/v1/controllers/lab", headers("admin", "adm1n"),
            r#"{"cloud": "azure", "region": "westeurope"}"#, &chain
        ));
        assert_eq!(response.status, Some(status::BadRequest));
        let body = response::extract_body_to_string(response);
        assert!(body.contains("aws, google, lxd"));
    }

    #[test]
    fn unsupported_series() {
        let (chain, _) = mock_chain();
        let response = error_response(request::post(
            "http://host:16016/api/v1/controllers/lab", headers("admin", "adm1n"),
            r#"{"cloud": "aws", "region": "eu-west-1", "series": "yakkety"}"#, &chain
        ));
        assert_eq!(response.status, Some(status::BadRequest));
    }

    #[test]
    fn regular_users_cannot_create() {
        let (chain, mock) = mock_chain();
        mock.add_login("alice", "pa55");
        let response = error_response(request::post(
            "http://host:16016/api/v1/controllers/lab", headers("alice", "pa55"),
            r#"{"cloud": "aws", "region": "eu-west-1"}"#, &chain
        ));
        assert_eq!(response.status, Some(status::Forbidden));
        assert_eq!(mock.directory_calls(), 0);
    }

    #[test]
    fn failed_bootstrap_is_reported() {
        let (chain, mock) = mock_chain();
        *mock.fail_bootstrap.lock().unwrap() = true;
        let response = error_response(request::post(
            "http://host:16016/api/v1/controllers/lab", headers("admin", "adm1n"),
            r#"{"cloud": "lxd", "region": "local"}"#, &chain
        ));
        assert_eq!(response.status, Some(status::InternalServerError));
        let body = response::extract_body_to_string(response);
        assert!(body.contains("external authority operation 'bootstrap lab' failed"));
        assert!(!body.contains("mock bootstrap failure"));
    }

    #[test]
    fn superuser_deletes_controller() {
        let (chain, mock) = mock_chain();
        mock.add_model("lab", "default");
        mock.add_login("alice", "pa55");
        let controller = Scope::for_controller("lab");
        mock.grant("alice", &controller, AccessLevel::Controller(ControllerLevel::Superuser)).unwrap();
        let response = request::delete(
            "http://host:16016/api/v1/controllers/lab", headers("alice", "pa55"), &chain
        ).unwrap();
        assert_eq!(response.status, Some(status::NoContent));
        assert!(mock.calls().contains(&MockCall::DestroyController(String::from("lab"))));
        assert!(!mock.scopes.lock().unwrap().contains(&controller));
        assert!(!mock.scopes.lock().unwrap().contains(&Scope::for_model("lab", "default")));
    }

    #[test]
    fn add_model_users_cannot_delete_controller() {
        let (chain, mock) = mock_chain();
        mock.add_controller("lab");
        mock.add_login("alice", "pa55");
        let controller = Scope::for_controller("lab");
        mock.grant("alice", &controller, AccessLevel::Controller(ControllerLevel::AddModel)).unwrap();
        let response = error_response(request::delete(
            "http://host:16016/api/v1/controllers/lab", headers("alice", "pa55"), &chain
        ));
        assert_eq!(response.status, Some(status::Forbidden));
        assert!(!mock.calls().contains(&MockCall::DestroyController(String::from("lab"))));
        assert!(mock.scopes.lock().unwrap().contains(&controller));
    }

    #[test]
    fn delete_unknown_controller_is_not_found() {
        let (chain, mock) = mock_chain();
        let response = error_response(request::delete(
            "http://host:16016/api/v1/controllers/prod", headers("admin", "adm1n"), &chain
        ));
        assert_eq!(response.status, Some(status::NotFound));
        assert!(!mock.calls().contains(&MockCall::DestroyController(String::from("prod"))));
    }
}
