//! Helpers to extract typed inputs from API requests.
//!
//! Missing or malformed inputs are reported as typed errors so that
//! handlers never fail on absent keys.
use std::any::Any;

use bodyparser;
use iron::Plugin;
use iron::Request;
use iron::headers::Authorization;
use iron::headers::Basic;
use router::Router;
use serde::de::DeserializeOwned;

use sojobo_models::Scope;

use super::super::ErrorKind;
use super::super::Result;
use super::super::access::AccessContext;
use super::super::access::AccessResolver;
use super::super::access::Identity;


/// Name of the header carrying the application key.
pub const API_KEY_HEADER: &str = "X-Api-Key";


/// Application key presented with the request.
pub fn api_key(req: &Request) -> Result<String> {
    let key = req.headers.get_raw(API_KEY_HEADER)
        .and_then(|values| values.first())
        .and_then(|raw| String::from_utf8(raw.clone()).ok());
    match key {
        Some(key) => Ok(key),
        None => Err(ErrorKind::Authentication.into()),
    }
}


/// Identity presented with HTTP Basic authentication.
pub fn identity(req: &Request) -> Result<Identity> {
    match req.headers.get::<Authorization<Basic>>() {
        Some(&Authorization(ref basic)) => {
            let secret = basic.password.clone().unwrap_or_default();
            Ok(Identity::new(basic.username.clone(), secret))
        }
        None => Err(ErrorKind::Authentication.into()),
    }
}


/// Value of a named route parameter.
pub fn param(req: &Request, name: &str) -> Result<String> {
    let value = req.extensions.get::<Router>()
        .and_then(|params| params.find(name))
        .map(String::from);
    match value {
        Some(ref value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ErrorKind::InvalidRequest(format!("missing '{}' parameter", name)).into()),
    }
}


/// Controller or model addressed by the `:controller` and `:model` route parameters.
pub fn scope(req: &Request) -> Result<Scope> {
    let controller = param(req, "controller")?;
    let model = req.extensions.get::<Router>().and_then(|params| params.find("model"));
    match model {
        Some(model) => Ok(Scope::for_model(controller, model)),
        None => Ok(Scope::for_controller(controller)),
    }
}


/// Verify the caller and resolve its access to `scope`.
pub fn authenticate(
    req: &Request, resolver: &AccessResolver, scope: Option<&Scope>
) -> Result<AccessContext> {
    let api_key = api_key(req)?;
    let identity = identity(req)?;
    resolver.authenticate(&api_key, &identity, scope)
}


/// Decode the JSON request body.
///
/// Bodies are only read when the request has a `Content-Type`.
pub fn body<T>(req: &mut Request) -> Result<T>
    where T: 'static + Any + Clone + DeserializeOwned,
{
    match req.get::<bodyparser::Struct<T>>() {
        Ok(Some(body)) => Ok(body),
        Ok(None) => Err(ErrorKind::InvalidRequest(String::from("request body missing")).into()),
        Err(error) => {
            let reason = format!("invalid request body: {}", error);
            Err(ErrorKind::InvalidRequest(reason).into())
        }
    }
}
