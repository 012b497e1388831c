use iron::Chain;
use iron::Handler;
use iron::method;
use router::Router;


/// Versions of the API endpoints are mounted under.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum APIVersion {
    V1,
}

impl APIVersion {
    /// Path prefix of all endpoints of the version.
    pub fn prefix(self) -> &'static str {
        match self {
            APIVersion::V1 => "/api/v1",
        }
    }
}


/// A builder object for an `iron-router` [`Router`].
///
/// [`Router`]: router/struct.Router.html
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new [`Router`] builder.
    ///
    /// [`Router`]: router/struct.Router.html
    pub fn new() -> RouterBuilder {
        let router = Router::new();
        RouterBuilder { router }
    }

    /// Convert this builder into an iron [`Chain`].
    ///
    /// [`Chain`]: iron/middleware/struct.Chain.html
    pub fn build(self) -> Chain {
        Chain::new(self.router)
    }

    /// Register routes for a specific API version.
    pub fn for_version(&mut self, version: APIVersion) -> VersionedRouter {
        let prefix = version.prefix();
        let router = &mut self.router;
        VersionedRouter { prefix, router }
    }

    /// Register a route outside of any API version.
    pub fn get<S: AsRef<str>, H: Handler, I: AsRef<str>>(
        &mut self, glob: S, handler: H, route_id: I
    ) -> &mut RouterBuilder {
        self.router.route(method::Get, glob, handler, route_id);
        self
    }
}


/// Specialised router to mount endpoints for a specified version.
pub struct VersionedRouter<'a> {
    prefix: &'static str,
    router: &'a mut Router,
}

impl<'a> VersionedRouter<'a> {
    /// Like route, but specialized to the `Delete` method.
    pub fn delete<S: AsRef<str>, H: Handler, I: AsRef<str>>(
        &mut self, glob: S, handler: H, route_id: I
    ) -> &mut VersionedRouter<'a> {
        self.route(method::Delete, glob, handler, route_id)
    }

    /// Like route, but specialized to the `Get` method.
    pub fn get<S: AsRef<str>, H: Handler, I: AsRef<str>>(
        &mut self, glob: S, handler: H, route_id: I
    ) -> &mut VersionedRouter<'a> {
        self.route(method::Get, glob, handler, route_id)
    }

    /// Like route, but specialized to the `Post` method.
    pub fn post<S: AsRef<str>, H: Handler, I: AsRef<str>>(
        &mut self, glob: S, handler: H, route_id: I
    ) -> &mut VersionedRouter<'a> {
        self.route(method::Post, glob, handler, route_id)
    }

    /// Like route, but specialized to the `Put` method.
    pub fn put<S: AsRef<str>, H: Handler, I: AsRef<str>>(
        &mut self, glob: S, handler: H, route_id: I
    ) -> &mut VersionedRouter<'a> {
        self.route(method::Put, glob, handler, route_id)
    }

    /// Wrapper for [`Router::route`] adding the version prefix to paths and route IDs.
    ///
    /// [`Router::route`]: router/struct.Router.html#method.route
    pub fn route<S: AsRef<str>, H: Handler, I: AsRef<str>>(
        &mut self, method: method::Method, glob: S, handler: H, route_id: I
    ) -> &mut VersionedRouter<'a> {
        let glob = self.prefix.to_string() + glob.as_ref();
        let route_id = self.prefix.to_string() + route_id.as_ref();
        self.router.route(method, glob, handler, route_id);
        self
    }
}
