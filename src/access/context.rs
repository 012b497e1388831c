use sojobo_models::ControllerLevel;
use sojobo_models::ModelLevel;
use sojobo_models::Scope;

use super::lattice::implies_model_level;


/// A scope resolved for a request along with the effective level on it.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Resolved<L> {
    pub name: String,
    pub access: L,
}

impl<L> Resolved<L> {
    fn new<S: Into<String>>(name: S, access: L) -> Resolved<L> {
        Resolved {
            name: name.into(),
            access,
        }
    }
}


/// Effective access of a user for a single request.
///
/// Contexts are built in one go by the `AccessResolver` and never change after that.
/// The constructors enforce the implication rules:
///
///   * The platform service identity has `superuser` and `admin` on any resolved scope.
///   * A controller `superuser` has `admin` on every model of the controller.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct AccessContext {
    username: String,
    controller: Option<Resolved<ControllerLevel>>,
    model: Option<Resolved<ModelLevel>>,
    platform_admin: bool,
}

impl AccessContext {
    /// Full access context for the platform service identity.
    pub fn platform_admin<S: Into<String>>(username: S, scope: Option<&Scope>) -> AccessContext {
        let controller = scope
            .map(|scope| Resolved::new(scope.controller_name(), ControllerLevel::Superuser));
        let model = scope
            .and_then(Scope::model_name)
            .map(|model| Resolved::new(model, ModelLevel::Admin));
        AccessContext {
            username: username.into(),
            controller,
            model,
            platform_admin: true,
        }
    }

    /// Access context for a regular user.
    ///
    /// The model level is raised to what the controller level implies, if anything.
    pub fn user<S: Into<String>>(
        username: S,
        controller: Option<(String, ControllerLevel)>,
        model: Option<(String, ModelLevel)>,
    ) -> AccessContext {
        let implied = controller.as_ref().and_then(|(_, level)| implies_model_level(*level));
        let model = model.map(|(name, level)| match implied {
            Some(implied) if implied > level => Resolved::new(name, implied),
            _ => Resolved::new(name, level),
        });
        let controller = controller.map(|(name, level)| Resolved::new(name, level));
        AccessContext {
            username: username.into(),
            controller,
            model,
            platform_admin: false,
        }
    }

    pub fn controller(&self) -> Option<&Resolved<ControllerLevel>> {
        self.controller.as_ref()
    }

    pub fn is_platform_admin(&self) -> bool {
        self.platform_admin
    }

    pub fn model(&self) -> Option<&Resolved<ModelLevel>> {
        self.model.as_ref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}


#[cfg(test)]
mod tests {
    use serde_json;

    use sojobo_models::ControllerLevel;
    use sojobo_models::ModelLevel;
    use sojobo_models::Scope;

    use super::AccessContext;

    #[test]
    fn platform_admin_has_full_access() {
        let scope = Scope::for_model("lab", "default");
        let context = AccessContext::platform_admin("admin", Some(&scope));
        assert!(context.is_platform_admin());
        assert_eq!(context.controller().unwrap().access, ControllerLevel::Superuser);
        assert_eq!(context.model().unwrap().access, ModelLevel::Admin);
        assert_eq!(context.model().unwrap().name, "default");
    }

    #[test]
    fn platform_admin_without_scope() {
        let context = AccessContext::platform_admin("admin", None);
        assert!(context.controller().is_none());
        assert!(context.model().is_none());
    }

    #[test]
    fn superuser_implies_model_admin() {
        let context = AccessContext::user(
            "bob",
            Some((String::from("lab"), ControllerLevel::Superuser)),
            Some((String::from("default"), ModelLevel::Read)),
        );
        assert_eq!(context.model().unwrap().access, ModelLevel::Admin);
    }

    #[test]
    fn regular_levels_are_kept() {
        let context = AccessContext::user(
            "bob",
            Some((String::from("lab"), ControllerLevel::AddModel)),
            Some((String::from("default"), ModelLevel::Read)),
        );
        assert!(!context.is_platform_admin());
        assert_eq!(context.controller().unwrap().access, ControllerLevel::AddModel);
        assert_eq!(context.model().unwrap().access, ModelLevel::Read);
    }

    #[test]
    fn to_json() {
        let context = AccessContext::user(
            "bob", Some((String::from("lab"), ControllerLevel::Login)), None
        );
        let payload = serde_json::to_string(&context).unwrap();
        assert_eq!(
            payload,
            r#"{"username":"bob","controller":{"name":"lab","access":"login"},"model":null,"platform_admin":false}"#
        );
    }
}
