use std::fmt;
use std::str::FromStr;

use pass_core::{Identifier, PassError};
use serde::{Deserialize, Serialize};

/// Address of an Instance node: `type / category / leaf name`.
///
/// Every leaf name encodes its own type and category, so a path can be
/// recovered from the name alone with [`str::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeafPath {
    pub pass_type: String,
    pub category: String,
    pub leaf: String,
}

impl LeafPath {
    #[must_use]
    pub fn new(pass_type: &str, category: &str, leaf: &str) -> Self {
        Self {
            pass_type: pass_type.to_owned(),
            category: category.to_owned(),
            leaf: leaf.to_owned(),
        }
    }
}

impl From<&Identifier> for LeafPath {
    fn from(id: &Identifier) -> Self {
        Self::new(id.pass_type(), id.category(), &id.to_string())
    }
}

impl FromStr for LeafPath {
    type Err = PassError;

    /// Derives the path of a leaf from its name. The leaf is the canonical
    /// form, so `bty_char_1` addresses the stored `bty_char_01`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(&Identifier::parse(s)?))
    }
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.pass_type, self.category, self.leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_name() {
        let path: LeafPath = "bty_char_01".parse().unwrap();
        assert_eq!(path, LeafPath::new("bty", "char", "bty_char_01"));
        assert_eq!(path.to_string(), "bty/char/bty_char_01");
    }

    #[test]
    fn test_parse_is_canonical() {
        let path: LeafPath = "bty_char_1".parse().unwrap();
        assert_eq!(path.leaf, "bty_char_01");
    }

    #[test]
    fn test_from_identifier() {
        let id = Identifier::new("rfl", "env", 3).unwrap();
        assert_eq!(LeafPath::from(&id).leaf, "rfl_env_03");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("char_01".parse::<LeafPath>().is_err());
    }
}
