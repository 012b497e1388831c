use iron::IronError;
use iron::Response;
use iron::status;
use iron::headers::ContentType;

use serde_json;

use sojobo_models::ScopeKind;


error_chain! {
    foreign_links {
        IoError(::std::io::Error);
        JsonDecode(::serde_json::Error);
        YamlDecode(::serde_yaml::Error);
    }

    errors {
        AlreadyExists(kind: ScopeKind, name: String) {
            description("scope already exists")
            display("{} '{}' already exists", kind, name)
        }

        Authentication {
            description("invalid application key or credentials")
            display("invalid application key or credentials")
        }

        Authorization(scope: String) {
            description("access denied")
            display("access to '{}' denied", scope)
        }

        ExternalCommand(operation: String) {
            description("external authority operation failed")
            display("external authority operation '{}' failed", operation)
        }

        InvalidRequest(reason: String) {
            description("invalid request")
            display("invalid request: {}", reason)
        }

        NotFound(kind: ScopeKind, name: String) {
            description("scope not found")
            display("{} '{}' not found", kind, name)
        }

        UnsupportedCloud(cloud: String, supported: Vec<String>) {
            description("unsupported cloud type")
            display(
                "cloud type '{}' is not supported, supported options are: {}",
                cloud, supported.join(", ")
            )
        }
    }
}

impl ErrorKind {
    /// Short, stable, name of the error kind for API consumers.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists(_, _) => "AlreadyExists",
            ErrorKind::Authentication => "Authentication",
            ErrorKind::Authorization(_) => "Authorization",
            ErrorKind::ExternalCommand(_) => "ExternalCommand",
            ErrorKind::InvalidRequest(_) => "InvalidRequest",
            ErrorKind::NotFound(_, _) => "NotFound",
            ErrorKind::UnsupportedCloud(_, _) => "UnsupportedCloud",
            _ => "Internal",
        }
    }

    fn status(&self) -> status::Status {
        match self {
            ErrorKind::AlreadyExists(_, _) => status::Conflict,
            ErrorKind::Authentication => status::Unauthorized,
            ErrorKind::Authorization(_) => status::Forbidden,
            ErrorKind::InvalidRequest(_) => status::BadRequest,
            ErrorKind::NotFound(_, _) => status::NotFound,
            ErrorKind::UnsupportedCloud(_, _) => status::BadRequest,
            _ => status::InternalServerError,
        }
    }
}

impl From<Error> for IronError {
    fn from(error: Error) -> Self {
        let code = error.kind().status();
        // Causes can carry raw juju output: they are logged by the request logger only.
        let wrapper = JsonErrorWrapper {
            error: error.to_string(),
            kind: String::from(error.kind().kind_name()),
        };
        let body = serde_json::to_string(&wrapper)
            .unwrap_or_else(|_| String::from(r#"{"error":"unable to encode error"}"#));
        let mut response = Response::with((code, body));
        response.headers.set(ContentType::json());
        if code == status::Unauthorized {
            response.headers.set_raw("WWW-Authenticate", vec![b"Basic realm=\"sojobo\"".to_vec()]);
        }
        let error = Box::new(error);
        IronError { error, response }
    }
}


#[derive(Serialize)]
struct JsonErrorWrapper {
    error: String,
    kind: String,
}
