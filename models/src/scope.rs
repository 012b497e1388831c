use std::fmt;


/// The two kinds of scope access levels are granted on.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Controller,
    Model,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScopeKind::Controller => write!(f, "controller"),
            ScopeKind::Model => write!(f, "model"),
        }
    }
}


/// Reference to a controller or to a model within a controller.
///
/// Models always nest under exactly one controller so a model scope
/// carries the name of its controller as well.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scope {
    Controller { controller: String },
    Model { controller: String, model: String },
}

impl Scope {
    /// Scope of the named controller.
    pub fn for_controller<S>(controller: S) -> Scope
        where S: Into<String>,
    {
        Scope::Controller { controller: controller.into() }
    }

    /// Scope of the named model in the named controller.
    pub fn for_model<S1, S2>(controller: S1, model: S2) -> Scope
        where S1: Into<String>,
              S2: Into<String>,
    {
        Scope::Model {
            controller: controller.into(),
            model: model.into(),
        }
    }

    /// Name of the controller this scope is (or belongs to).
    pub fn controller_name(&self) -> &str {
        match self {
            Scope::Controller { controller } => controller.as_str(),
            Scope::Model { controller, .. } => controller.as_str(),
        }
    }

    /// Name of the model, for model scopes.
    pub fn model_name(&self) -> Option<&str> {
        match self {
            Scope::Controller { .. } => None,
            Scope::Model { model, .. } => Some(model.as_str()),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Controller { .. } => ScopeKind::Controller,
            Scope::Model { .. } => ScopeKind::Model,
        }
    }

    /// The controller scope a model scope nests under.
    ///
    /// Controller scopes have no parent.
    pub fn parent(&self) -> Option<Scope> {
        match self {
            Scope::Controller { .. } => None,
            Scope::Model { controller, .. } => Some(Scope::for_controller(controller.clone())),
        }
    }
}

/// Scopes are formatted the way `juju` references them: `controller` or `controller:model`.
impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scope::Controller { controller } => write!(f, "{}", controller),
            Scope::Model { controller, model } => write!(f, "{}:{}", controller, model),
        }
    }
}


#[cfg(test)]
mod tests {
    use serde_json;

    use super::Scope;
    use super::ScopeKind;

    #[test]
    fn display_juju_references() {
        assert_eq!(Scope::for_controller("lab").to_string(), "lab");
        assert_eq!(Scope::for_model("lab", "default").to_string(), "lab:default");
    }

    #[test]
    fn model_parent_is_controller() {
        let model = Scope::for_model("lab", "default");
        assert_eq!(model.kind(), ScopeKind::Model);
        assert_eq!(model.controller_name(), "lab");
        assert_eq!(model.model_name(), Some("default"));
        assert_eq!(model.parent(), Some(Scope::for_controller("lab")));
        assert_eq!(Scope::for_controller("lab").parent(), None);
    }

    #[test]
    fn to_json() {
        let scope = Scope::for_model("lab", "default");
        let payload = serde_json::to_string(&scope).unwrap();
        assert_eq!(payload, r#"{"kind":"model","controller":"lab","model":"default"}"#);
    }
}
