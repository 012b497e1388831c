use std::error::Error;
use std::fmt;
use std::str::FromStr;

use super::ScopeKind;


/// Access levels on a controller, in ascending order.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControllerLevel {
    None,
    Login,
    AddModel,
    Superuser,
}

impl ControllerLevel {
    /// All controller levels, lowest first.
    pub const LADDER: [ControllerLevel; 4] = [
        ControllerLevel::None,
        ControllerLevel::Login,
        ControllerLevel::AddModel,
        ControllerLevel::Superuser,
    ];

    /// Name of the level as understood by `juju`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerLevel::None => "none",
            ControllerLevel::Login => "login",
            ControllerLevel::AddModel => "add-model",
            ControllerLevel::Superuser => "superuser",
        }
    }
}

impl fmt::Display for ControllerLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ControllerLevel {
    type Err = ParseLevelError;

    fn from_str(value: &str) -> Result<ControllerLevel, ParseLevelError> {
        ControllerLevel::LADDER.iter()
            .find(|level| level.as_str() == value)
            .cloned()
            .ok_or_else(|| ParseLevelError::new(ScopeKind::Controller, value))
    }
}


/// Access levels on a model, in ascending order.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelLevel {
    None,
    Read,
    Write,
    Admin,
}

impl ModelLevel {
    /// All model levels, lowest first.
    pub const LADDER: [ModelLevel; 4] = [
        ModelLevel::None,
        ModelLevel::Read,
        ModelLevel::Write,
        ModelLevel::Admin,
    ];

    /// Name of the level as understood by `juju`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelLevel::None => "none",
            ModelLevel::Read => "read",
            ModelLevel::Write => "write",
            ModelLevel::Admin => "admin",
        }
    }
}

impl fmt::Display for ModelLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelLevel {
    type Err = ParseLevelError;

    fn from_str(value: &str) -> Result<ModelLevel, ParseLevelError> {
        ModelLevel::LADDER.iter()
            .find(|level| level.as_str() == value)
            .cloned()
            .ok_or_else(|| ParseLevelError::new(ScopeKind::Model, value))
    }
}


/// An access level tagged with the kind of scope it belongs to.
///
/// Levels of different kinds are never comparable with each other.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize)]
#[serde(untagged)]
pub enum AccessLevel {
    Controller(ControllerLevel),
    Model(ModelLevel),
}

impl AccessLevel {
    /// Parse a level name for the given kind of scope.
    pub fn parse(kind: ScopeKind, value: &str) -> Result<AccessLevel, ParseLevelError> {
        match kind {
            ScopeKind::Controller => value.parse().map(AccessLevel::Controller),
            ScopeKind::Model => value.parse().map(AccessLevel::Model),
        }
    }

    /// The `none` level for the given kind of scope.
    pub fn none(kind: ScopeKind) -> AccessLevel {
        match kind {
            ScopeKind::Controller => AccessLevel::Controller(ControllerLevel::None),
            ScopeKind::Model => AccessLevel::Model(ModelLevel::None),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Controller(level) => level.as_str(),
            AccessLevel::Model(level) => level.as_str(),
        }
    }

    pub fn is_none(&self) -> bool {
        *self == AccessLevel::none(self.kind())
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            AccessLevel::Controller(_) => ScopeKind::Controller,
            AccessLevel::Model(_) => ScopeKind::Model,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ControllerLevel> for AccessLevel {
    fn from(level: ControllerLevel) -> AccessLevel {
        AccessLevel::Controller(level)
    }
}

impl From<ModelLevel> for AccessLevel {
    fn from(level: ModelLevel) -> AccessLevel {
        AccessLevel::Model(level)
    }
}


/// A level name that does not exist for the requested kind of scope.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseLevelError {
    kind: ScopeKind,
    value: String,
}

impl ParseLevelError {
    fn new<S>(kind: ScopeKind, value: S) -> ParseLevelError
        where S: Into<String>,
    {
        ParseLevelError {
            kind,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}' is not a valid {} access level", self.value, self.kind)
    }
}

impl Error for ParseLevelError {}


#[cfg(test)]
mod tests {
    use serde_json;

    use super::super::ScopeKind;
    use super::AccessLevel;
    use super::ControllerLevel;
    use super::ModelLevel;

    #[test]
    fn controller_levels_are_ordered() {
        assert!(ControllerLevel::None < ControllerLevel::Login);
        assert!(ControllerLevel::Login < ControllerLevel::AddModel);
        assert!(ControllerLevel::AddModel < ControllerLevel::Superuser);
    }

    #[test]
    fn model_levels_are_ordered() {
        assert!(ModelLevel::None < ModelLevel::Read);
        assert!(ModelLevel::Read < ModelLevel::Write);
        assert!(ModelLevel::Write < ModelLevel::Admin);
    }

    #[test]
    fn parse_juju_names() {
        assert_eq!("add-model".parse(), Ok(ControllerLevel::AddModel));
        assert_eq!("admin".parse(), Ok(ModelLevel::Admin));
        let level = AccessLevel::parse(ScopeKind::Model, "write").unwrap();
        assert_eq!(level, AccessLevel::Model(ModelLevel::Write));
    }

    #[test]
    fn parse_rejects_other_kind() {
        let error = AccessLevel::parse(ScopeKind::Controller, "write").unwrap_err();
        assert_eq!(error.kind(), ScopeKind::Controller);
        assert_eq!(error.to_string(), "'write' is not a valid controller access level");
    }

    #[test]
    fn none_levels() {
        assert!(AccessLevel::none(ScopeKind::Controller).is_none());
        assert!(AccessLevel::Model(ModelLevel::None).is_none());
        assert!(!AccessLevel::Controller(ControllerLevel::Login).is_none());
    }

    #[test]
    fn to_json() {
        let level = AccessLevel::Controller(ControllerLevel::AddModel);
        assert_eq!(serde_json::to_string(&level).unwrap(), r#""add-model""#);
        let level: ModelLevel = serde_json::from_str(r#""read""#).unwrap();
        assert_eq!(level, ModelLevel::Read);
    }
}
