extern crate serde;
#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate serde_json;


mod level;
mod scope;

pub use self::level::AccessLevel;
pub use self::level::ControllerLevel;
pub use self::level::ModelLevel;
pub use self::level::ParseLevelError;
pub use self::scope::Scope;
pub use self::scope::ScopeKind;
