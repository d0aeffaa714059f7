//! Extension configuration.
//!
//! ```toml
//! subtype-policy = "strict"      # or "lenient"
//! field-collision = "overwrite"  # or "reject"
//! ```

use crate::error::Isa95Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens when a type definition is outside its category's base type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtypePolicy {
    /// Reject with `SubtypeViolation`.
    #[default]
    Strict,
    /// Log a warning and accept the type definition.
    Lenient,
}

/// What happens when an attribute's field name is already bound on its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldCollisionPolicy {
    /// The newest attribute takes the field.
    #[default]
    Overwrite,
    /// Reject with `FieldCollision`.
    Reject,
}

impl std::str::FromStr for SubtypePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(format!("unknown subtype policy: {s}")),
        }
    }
}

impl std::str::FromStr for FieldCollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            _ => Err(format!("unknown field collision policy: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExtensionConfig {
    pub subtype_policy: SubtypePolicy,
    pub field_collision: FieldCollisionPolicy,
}

impl ExtensionConfig {
    /// The compatibility profile: subtype violations are only logged.
    pub fn lenient() -> Self {
        Self {
            subtype_policy: SubtypePolicy::Lenient,
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, Isa95Error> {
        toml::from_str(raw).map_err(|e| Isa95Error::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Isa95Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Isa95Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_overwrite() {
        let config = ExtensionConfig::default();
        assert_eq!(config.subtype_policy, SubtypePolicy::Strict);
        assert_eq!(config.field_collision, FieldCollisionPolicy::Overwrite);
        assert_eq!(ExtensionConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn parses_toml() {
        let config = ExtensionConfig::from_toml_str(
            "subtype-policy = \"lenient\"\nfield-collision = \"reject\"\n",
        )
        .unwrap();
        assert_eq!(config.subtype_policy, SubtypePolicy::Lenient);
        assert_eq!(config.field_collision, FieldCollisionPolicy::Reject);
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(matches!(
            ExtensionConfig::from_toml_str("subtype-policy = \"maybe\""),
            Err(Isa95Error::Config(_))
        ));
        assert!(matches!(
            ExtensionConfig::from_toml_str("verbose = true"),
            Err(Isa95Error::Config(_))
        ));
    }

    #[test]
    fn policy_parse() {
        assert_eq!("Lenient".parse::<SubtypePolicy>().unwrap(), SubtypePolicy::Lenient);
        assert_eq!(
            "reject".parse::<FieldCollisionPolicy>().unwrap(),
            FieldCollisionPolicy::Reject
        );
        assert!("sometimes".parse::<SubtypePolicy>().is_err());
    }
}
