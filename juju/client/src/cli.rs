use std::collections::HashMap;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use slog::Logger;

use sojobo_models::AccessLevel;
use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;
use sojobo_models::ScopeKind;

use super::Credentials;
use super::CommandOutput;
use super::CommandRunner;
use super::Error;
use super::ErrorKind;
use super::InnerAuthority;
use super::Result;
use super::ResultExt;

use super::metrics::JUJU_OPS_COUNT;
use super::metrics::JUJU_OPS_DURATION;
use super::metrics::JUJU_OP_ERRORS_COUNT;
use super::metrics::JUJU_TIMEOUT;


/// Output emitted by juju when the CLI session is no longer logged in.
const SESSION_EXPIRED: &str = "no credentials provided";

/// Outputs that indicate a login attempt was rejected.
const LOGIN_REJECTED: [&str; 2] = [
    "invalid entity name or password",
    "unauthorized access",
];

/// Outputs that indicate a grant or revoke found nothing to change.
const NOOP_CHANGE: [&str; 3] = [
    "already has",
    "does not have",
    "has no",
];


/// `juju controllers --format json`
#[derive(Deserialize)]
struct ControllersList {
    #[serde(default)]
    controllers: Option<HashMap<String, ::serde_json::Value>>,
}

/// Item of `juju users --format json`
#[derive(Deserialize)]
struct ControllerUser {
    #[serde(rename = "user-name")]
    user_name: String,

    #[serde(default)]
    access: String,
}

/// `juju models --format json`
#[derive(Deserialize)]
struct ModelsList {
    #[serde(default)]
    models: Vec<ModelsListItem>,
}

#[derive(Deserialize)]
struct ModelsListItem {
    name: String,

    #[serde(default, rename = "short-name")]
    short_name: Option<String>,
}

impl ModelsListItem {
    /// Model names may be listed qualified by their owner (`owner/name`).
    fn matches(&self, model: &str) -> bool {
        if self.short_name.as_ref().map(String::as_str) == Some(model) {
            return true;
        }
        self.name == model || self.name.rsplit('/').next() == Some(model)
    }
}

/// Value of `juju show-model --format json`, keyed by model name.
#[derive(Deserialize)]
struct ModelDetails {
    #[serde(default)]
    users: HashMap<String, ModelUser>,
}

#[derive(Deserialize)]
struct ModelUser {
    #[serde(default)]
    access: String,
}


/// Interface to the `juju` command line tool.
///
/// All commands run with the administrator session of the CLI.
/// The administrator password is sent on standard input so that an expired
/// session can be renewed transparently.
pub struct JujuCli {
    admin: Credentials,
    logger: Logger,
    runner: Box<dyn CommandRunner>,

    /// Admin commands share the CLI session, login verification takes it over.
    session: RwLock<()>,
}

impl JujuCli {
    pub fn new(runner: Box<dyn CommandRunner>, admin: Credentials, logger: Logger) -> JujuCli {
        JujuCli {
            admin,
            logger,
            runner,
            session: RwLock::new(()),
        }
    }

    /// Names of all controllers known to the CLI.
    pub fn controllers(&self) -> Result<Vec<String>> {
        let list: ControllersList = self.json(args(&["controllers", "--format", "json"]), None)?;
        let mut names: Vec<String> = list.controllers
            .map(|controllers| controllers.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }
}

impl JujuCli {
    /// Run a command, tracking stats and turning failures into errors.
    fn execute(&self, args: &[String], input: Option<&str>) -> Result<CommandOutput> {
        let command = args.first().cloned().unwrap_or_default();
        JUJU_OPS_COUNT.with_label_values(&[&command]).inc();
        let timer = JUJU_OPS_DURATION.with_label_values(&[&command]).start_timer();
        let result = self.runner.run(args, input);
        timer.observe_duration();
        match result {
            Err(Error(ErrorKind::CommandTimeout(command, seconds), state)) => {
                JUJU_OP_ERRORS_COUNT.with_label_values(&[&command]).inc();
                JUJU_TIMEOUT.with_label_values(&[&command]).inc();
                Err(Error(ErrorKind::CommandTimeout(command, seconds), state))
            }
            Err(error) => {
                JUJU_OP_ERRORS_COUNT.with_label_values(&[&command]).inc();
                Err(error)
            }
            Ok(output) => {
                if !output.success {
                    JUJU_OP_ERRORS_COUNT.with_label_values(&[&command]).inc();
                }
                Ok(output)
            }
        }
    }

    /// Run a command with the admin session, logging in again if the session expired.
    ///
    /// The command is re-run at most once after a successful login.
    fn admin(&self, args: Vec<String>, controller: Option<&str>) -> Result<String> {
        let _session = self.session.read().unwrap_or_else(PoisonError::into_inner);
        let command = args[0].clone();
        let input = format!("{}\n", self.admin.password);
        let output = self.execute(&args, Some(&input))?;
        if output.success {
            return Ok(output.output);
        }
        if !output.output.contains(SESSION_EXPIRED) {
            return Err(ErrorKind::CommandFailed(command, output.output.trim().to_string()).into());
        }

        info!(self.logger, "Juju admin session expired, logging in again"; "command" => &command);
        self.admin_login(controller)?;
        let output = self.execute(&args, Some(&input))?;
        if output.success {
            Ok(output.output)
        } else {
            Err(ErrorKind::CommandFailed(command, output.output.trim().to_string()).into())
        }
    }

    /// Log the CLI in with the admin credentials.
    ///
    /// Callers must hold the session lock.
    fn admin_login(&self, controller: Option<&str>) -> Result<()> {
        let input = format!("{}\n", self.admin.password);
        let mut login = vec![String::from("login"), self.admin.username.clone()];
        if let Some(controller) = controller {
            login.push(String::from("-c"));
            login.push(String::from(controller));
        }
        let output = self.execute(&login, Some(&input))?;
        if !output.success {
            let output = output.output.trim().to_string();
            return Err(ErrorKind::CommandFailed(String::from("login"), output).into());
        }
        Ok(())
    }

    /// Log the CLI in as `user`, reporting whether the credentials were accepted.
    ///
    /// Callers must hold the session lock for writing.
    fn user_login(&self, user: &str, secret: &str, controller: &str) -> Result<bool> {
        let logout = args(&["logout", "-c", controller]);
        let output = self.execute(&logout, None)?;
        if !output.success {
            debug!(self.logger, "Logout before login verification failed"; "output" => output.output);
        }

        let login = args(&["login", user, "-c", controller]);
        let input = format!("{}\n", secret);
        let output = self.execute(&login, Some(&input))?;
        if output.success {
            self.execute(&logout, None)?;
            return Ok(true);
        }
        if LOGIN_REJECTED.iter().any(|rejected| output.output.contains(rejected)) {
            return Ok(false);
        }
        Err(ErrorKind::CommandFailed(String::from("login"), output.output.trim().to_string()).into())
    }

    /// Run an admin command and decode its JSON output.
    fn json<T>(&self, args: Vec<String>, controller: Option<&str>) -> Result<T>
        where T: DeserializeOwned,
    {
        let command = args[0].clone();
        let output = self.admin(args, controller)?;
        let value = ::serde_json::from_str(&output)
            .chain_err(|| ErrorKind::UnexpectedOutput(command, String::from("invalid JSON")))?;
        Ok(value)
    }

    /// Build `juju grant|revoke` arguments for a user, scope and level.
    fn change_args(command: &str, user: &str, scope: &Scope, level: AccessLevel) -> Result<Vec<String>> {
        if level.kind() != scope.kind() {
            return Err(ErrorKind::LevelScopeMismatch(level, scope.kind()).into());
        }
        let mut change = args(&[command, user, level.as_str()]);
        if let Some(model) = scope.model_name() {
            change.push(String::from(model));
        }
        change.push(String::from("-c"));
        change.push(String::from(scope.controller_name()));
        Ok(change)
    }

    /// Issue a grant or revoke, treating "nothing to change" as success.
    fn change(&self, command: &str, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        let change = JujuCli::change_args(command, user, scope, level)?;
        match self.admin(change, Some(scope.controller_name())) {
            Ok(_) => Ok(()),
            Err(Error(ErrorKind::CommandFailed(_, ref output), _))
                if NOOP_CHANGE.iter().any(|noop| output.contains(noop)) => {
                debug!(
                    self.logger, "Access change was a no-op";
                    "op" => command, "user" => user, "scope" => %scope, "level" => %level
                );
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    fn controller_access(&self, user: &str, controller: &str) -> Result<Option<AccessLevel>> {
        let users: Vec<ControllerUser> = self.json(
            args(&["users", "--format", "json", "-c", controller]), Some(controller)
        )?;
        let access = users.into_iter()
            .find(|entry| entry.user_name == user)
            .map(|entry| entry.access)
            .filter(|access| !access.is_empty());
        match access {
            None => Ok(None),
            Some(access) => {
                let level: ControllerLevel = access.parse()
                    .chain_err(|| ErrorKind::UnexpectedOutput(
                        String::from("users"), format!("unknown access '{}'", access)
                    ))?;
                Ok(Some(AccessLevel::Controller(level)))
            }
        }
    }

    fn model_access(&self, user: &str, controller: &str, model: &str) -> Result<Option<AccessLevel>> {
        let reference = format!("{}:{}", controller, model);
        let details: HashMap<String, ModelDetails> = self.json(
            args(&["show-model", &reference, "--format", "json"]), Some(controller)
        )?;
        let details = details.into_iter().next().map(|(_, details)| details)
            .ok_or_else(|| ErrorKind::UnexpectedOutput(
                String::from("show-model"), String::from("no model details")
            ))?;
        let access = details.users.get(user)
            .map(|entry| entry.access.clone())
            .filter(|access| !access.is_empty());
        match access {
            None => Ok(None),
            Some(access) => {
                let level: ModelLevel = access.parse()
                    .chain_err(|| ErrorKind::UnexpectedOutput(
                        String::from("show-model"), format!("unknown access '{}'", access)
                    ))?;
                Ok(Some(AccessLevel::Model(level)))
            }
        }
    }
}

impl InnerAuthority for JujuCli {
    fn bootstrap(&self, args: Vec<String>) -> Result<()> {
        let mut bootstrap = vec![String::from("bootstrap")];
        bootstrap.extend(args);
        self.admin(bootstrap, None)?;
        Ok(())
    }

    fn create_model(&self, controller: &str, model: &str) -> Result<()> {
        self.admin(args(&["add-model", model, "-c", controller]), Some(controller))?;
        Ok(())
    }

    fn destroy_controller(&self, controller: &str) -> Result<()> {
        self.admin(args(&["destroy-controller", controller, "-y"]), Some(controller))?;
        Ok(())
    }

    fn destroy_model(&self, controller: &str, model: &str) -> Result<()> {
        let reference = format!("{}:{}", controller, model);
        self.admin(args(&["destroy-model", "-y", &reference]), Some(controller))?;
        Ok(())
    }

    fn grant(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        self.change("grant", user, scope, level)
    }

    fn query_access(&self, user: &str, scope: &Scope) -> Result<Option<AccessLevel>> {
        match scope {
            Scope::Controller { controller } => self.controller_access(user, controller),
            Scope::Model { controller, model } => self.model_access(user, controller, model),
        }
    }

    fn revoke(&self, user: &str, scope: &Scope, level: AccessLevel) -> Result<()> {
        self.change("revoke", user, scope, level)
    }

    fn scope_exists(&self, scope: &Scope) -> Result<bool> {
        let controller = scope.controller_name();
        let known = self.controllers()?.iter().any(|name| name == controller);
        match (scope.kind(), known) {
            (_, false) => Ok(false),
            (ScopeKind::Controller, true) => Ok(true),
            (ScopeKind::Model, true) => {
                let model = scope.model_name().unwrap_or_default();
                let list: ModelsList = self.json(
                    args(&["models", "--format", "json", "-c", controller]), Some(controller)
                )?;
                Ok(list.models.iter().any(|item| item.matches(model)))
            }
        }
    }

    fn verify_login(&self, user: &str, secret: &str) -> Result<bool> {
        let controller = match self.controllers()?.into_iter().next() {
            Some(controller) => controller,
            None => {
                warn!(self.logger, "Cannot verify credentials without a controller"; "user" => user);
                return Ok(false);
            }
        };

        // Admin commands wait until the admin session is back.
        let _session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        let verified = self.user_login(user, secret, &controller);
        if let Err(error) = self.admin_login(Some(&controller)) {
            warn!(
                self.logger, "Failed to restore juju admin session";
                "controller" => &controller, "error" => %error
            );
        }
        verified
    }
}

/// Convert a slice of string references into command arguments.
fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| String::from(*arg)).collect()
}
