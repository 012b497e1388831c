use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;

use sojobo_models::AccessLevel;
use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;

use super::ErrorKind;
use super::InnerAuthority;
use super::Result;


/// Operations observed by the `MockAuthority`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum MockCall {
    Bootstrap(Vec<String>),
    CreateModel(String, String),
    DestroyController(String),
    DestroyModel(String, String),
    Grant(String, Scope, AccessLevel),
    QueryAccess(String, Scope),
    Revoke(String, Scope, AccessLevel),
    ScopeExists(Scope),
    VerifyLogin(String),
}

impl MockCall {
    /// Calls that read from the authority's directory.
    pub fn is_directory_call(&self) -> bool {
        match self {
            MockCall::QueryAccess(_, _) | MockCall::ScopeExists(_) => true,
            _ => false,
        }
    }
}


/// In-memory authority that behaves like the `juju` tool.
///
/// Granting a level records every level up to it while revoking
/// a level only removes that one level.
#[derive(Default)]
pub struct MockAuthority {
    /// Held levels for each (user, scope).
    pub access: Mutex<HashMap<(String, Scope), HashSet<AccessLevel>>>,

    /// Calls received, in order.
    pub calls: Mutex<Vec<MockCall>>,

    /// Known usernames and their passwords.
    pub logins: Mutex<HashMap<String, String>>,

    /// Controllers and models that exist.
    pub scopes: Mutex<HashSet<Scope>>,

    /// Fail calls to `bootstrap`.
    pub fail_bootstrap: Mutex<bool>,

    /// Fail calls to `grant` with this level.
    pub fail_grant: Mutex<Option<AccessLevel>>,

    /// Fail calls to `revoke` with this level.
    pub fail_revoke: Mutex<Option<AccessLevel>>,
}

impl MockAuthority {
    pub fn new() -> MockAuthority {
        MockAuthority::default()
    }

    /// Register a controller.
    pub fn add_controller(&self, controller: &str) {
        self.scopes.lock().unwrap().insert(Scope::for_controller(controller));
    }

    /// Register a model, and its controller.
    pub fn add_model(&self, controller: &str, model: &str) {
        let mut scopes = self.scopes.lock().unwrap();
        scopes.insert(Scope::for_controller(controller));
        scopes.insert(Scope::for_model(controller, model));
    }

    /// Register a user that can log in.
    pub fn add_login(&self, user: &str, secret: &str) {
        self.logins.lock().unwrap().insert(String::from(user), String::from(secret));
    }

    /// Replace the held levels of a user on a scope.
    ///
    /// An empty list leaves a record with no access.
    pub fn set_access(&self, user: &str, scope: &Scope, levels: &[AccessLevel]) {
        let levels = levels.iter().cloned().collect();
        self.access.lock().unwrap().insert((String::from(user), scope.clone()), levels);
    }

    /// Levels currently held by a user on a scope, lowest first.
    pub fn held(&self, user: &str, scope: &Scope) -> Vec<AccessLevel> {
        self.access.lock().unwrap()
            .get(&(String::from(user), scope.clone()))
            .map(|levels| MockAuthority::ascending()
                .filter(|level| levels.contains(level))
                .collect())
            .unwrap_or_default()
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded grant and revoke calls.
    pub fn changes(&self) -> Vec<MockCall> {
        self.calls().into_iter()
            .filter(|call| match call {
                MockCall::Grant(_, _, _) | MockCall::Revoke(_, _, _) => true,
                _ => false,
            })
            .collect()
    }

    /// Number of directory reads received.
    pub fn directory_calls(&self) -> usize {
        self.calls().iter().filter(|call| call.is_directory_call()).count()
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every level of every kind, lowest first within each kind.
    fn ascending() -> impl Iterator<Item = AccessLevel> {
        let controller = ControllerLevel::LADDER.to_vec().into_iter().map(AccessLevel::Controller);
        let model = ModelLevel::LADDER.to_vec().into_iter().map(AccessLevel::Model);
        controller.chain(model)
    }

    /// Levels implied by holding `level`, excluding none.
    fn implied(level: AccessLevel) -> Vec<AccessLevel> {
        match level {
            AccessLevel::Controller(level) => ControllerLevel::LADDER.iter()
                .filter(|step| **step != ControllerLevel::None && **step <= level)
                .map(|step| AccessLevel::Controller(*step))
                .collect(),
            AccessLevel::Model(level) => ModelLevel::LADDER.iter()
                .filter(|step| **step != ModelLevel::None && **step <= level)
                .map(|step| AccessLevel::Model(*step))
                .collect(),
        }
    }

    /// Forget scopes, and access to them, matching a predicate.
    fn forget<F>(&self, remove: F)
        where F: Fn(&Scope) -> bool,
    {
        self.scopes.lock().unwrap().retain(|scope| !remove(scope));
        self.access.lock().unwrap().retain(|(_, scope), _| !remove(scope));
    }

    fn check_kind(level: AccessLevel, scope: &Scope) -> Result<()> {
        if level.kind() != scope.kind() {
            return Err(ErrorKind::LevelScopeMismatch(level, scope.kind()).into());
        }
        Ok(())
    }
}

impl InnerAuthority for MockAuthority {
    fn bootstrap(&self, args: Vec<String>) -> Result<()> {
        self.record(MockCall::Bootstrap(args.clone()));
        if *self.fail_bootstrap.lock().unwrap() {
            return Err(ErrorKind::CommandFailed(
                String::from("bootstrap"), String::from("mock bootstrap failure")
            ).into());
        }
        // The controller name follows the cloud in `juju bootstrap` arguments.
        if let Some(controller) = args.get(1) {
            self.add_controller(controller);
        }
        Ok(())
    }

    fn create_model(&self, controller: &str, model: &str) -> Result<()> {
        self.record(MockCall::CreateModel(String::from(controller), String::from(model)));
        let scope = Scope::for_model(controller, model);
        if self.scopes.lock().unwrap().contains(&scope) {
            return Err(ErrorKind::CommandFailed(
                String::from("add-model"), format!("model \"{}\" already exists", model)
            ).into());
        }
        self.add_model(controller, model);
        Ok(())
    }

    fn destroy_controller(&self, controller: &str) -> Result<()> {
        self.record(MockCall::DestroyController(String::from(controller)));
        self.forget(|scope| scope.controller_name() == controller);
        Ok(())
    }

    fn destroy_model(&self, controller: &str, model: &str) -> Result<()> {
        self.record(MockCall::DestroyModel(String::from(controller), String::from(model)));
        let target = Scope::for_model(controller, model);
        self.forget(|scope| *scope == target);
        Ok(())
    }

    fn grant(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        self.record(MockCall::Grant(String::from(user), scope.clone(), level));
        MockAuthority::check_kind(level, scope)?;
        if *self.fail_grant.lock().unwrap() == Some(level) {
            return Err(ErrorKind::CommandFailed(
                String::from("grant"), format!("mock grant failure for {}", level)
            ).into());
        }
        let mut access = self.access.lock().unwrap();
        let held = access.entry((String::from(user), scope.clone())).or_insert_with(HashSet::new);
        held.extend(MockAuthority::implied(level));
        Ok(())
    }

    fn query_access(&self, user: &str, scope: &Scope) -> Result<Option<AccessLevel>> {
        self.record(MockCall::QueryAccess(String::from(user), scope.clone()));
        let access = self.access.lock().unwrap();
        let level = access.get(&(String::from(user), scope.clone()))
            .and_then(|levels| MockAuthority::ascending()
                .filter(|level| levels.contains(level))
                .last());
        Ok(level)
    }

    fn revoke(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        self.record(MockCall::Revoke(String::from(user), scope.clone(), level));
        MockAuthority::check_kind(level, scope)?;
        if *self.fail_revoke.lock().unwrap() == Some(level) {
            return Err(ErrorKind::CommandFailed(
                String::from("revoke"), format!("mock revoke failure for {}", level)
            ).into());
        }
        let mut access = self.access.lock().unwrap();
        if let Some(held) = access.get_mut(&(String::from(user), scope.clone())) {
            held.remove(&level);
        }
        Ok(())
    }

    fn scope_exists(&self, scope: &Scope) -> Result<bool> {
        self.record(MockCall::ScopeExists(scope.clone()));
        Ok(self.scopes.lock().unwrap().contains(scope))
    }

    fn verify_login(&self, user: &str, secret: &str) -> Result<bool> {
        self.record(MockCall::VerifyLogin(String::from(user)));
        let logins = self.logins.lock().unwrap();
        Ok(logins.get(user).map(|known| known == secret).unwrap_or(false))
    }
}
