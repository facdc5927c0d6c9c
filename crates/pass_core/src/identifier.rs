//! Pass Identifiers
//!
//! Every pass instance is named `type_category_NN`, for example `bty_char_01`.
//! This string is the only interchange format between the editor, the host
//! parameter store and the network builder, so all parsing and formatting
//! goes through [`Identifier`].
//!
//! # Rules
//!
//! - ASCII only, at least three non-empty segments separated by [`SEPARATOR`]
//! - The first segment is the type, the last segment is the iteration
//! - Everything in between is the category (so `bty_char_hair_01` has the
//!   category `char_hair`)
//! - The iteration is all ASCII digits, at least 1, any width when parsing,
//!   zero-padded to [`ITERATION_WIDTH`] when formatting

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{PassError, Result};

/// Segment separator of the naming scheme.
pub const SEPARATOR: char = '_';

/// Minimum width of the formatted iteration. Wider values are never truncated.
pub const ITERATION_WIDTH: usize = 2;

/// A parsed `type_category_iteration` pass name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    pass_type: String,
    category: String,
    iteration: u32,
}

impl Identifier {
    /// Builds an identifier from its three parts.
    ///
    /// Fails with [`PassError::MalformedName`] when a part is not ASCII, the
    /// type is empty or contains the separator, or the category has empty
    /// segments, and with
    /// [`PassError::BadIteration`] when `iteration` is zero.
    pub fn new(pass_type: &str, category: &str, iteration: u32) -> Result<Self> {
        let id = Self {
            pass_type: pass_type.to_owned(),
            category: category.to_owned(),
            iteration,
        };

        if !pass_type.is_ascii() || !category.is_ascii() {
            return Err(PassError::MalformedName(id.to_string()));
        }
        if pass_type.is_empty() || pass_type.contains(SEPARATOR) {
            return Err(PassError::MalformedName(id.to_string()));
        }
        if category.is_empty() || category.split(SEPARATOR).any(str::is_empty) {
            return Err(PassError::MalformedName(id.to_string()));
        }
        if iteration == 0 {
            return Err(PassError::BadIteration(id.to_string()));
        }
        Ok(id)
    }

    /// Parses a raw pass name.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split(SEPARATOR).collect();
        if !raw.is_ascii() || segments.len() < 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(PassError::MalformedName(raw.to_owned()));
        }

        let last = segments[segments.len() - 1];
        if !last.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PassError::BadIteration(raw.to_owned()));
        }
        let iteration: u32 = last
            .parse()
            .map_err(|_| PassError::BadIteration(raw.to_owned()))?;
        if iteration == 0 {
            return Err(PassError::BadIteration(raw.to_owned()));
        }

        let separator = SEPARATOR.to_string();
        let category = segments[1..segments.len() - 1].join(separator.as_str());
        Ok(Self {
            pass_type: segments[0].to_owned(),
            category,
            iteration,
        })
    }

    /// Returns a copy with the iteration replaced.
    #[must_use]
    pub fn with_iteration(&self, iteration: u32) -> Self {
        Self {
            pass_type: self.pass_type.clone(),
            category: self.category.clone(),
            iteration,
        }
    }

    #[inline]
    #[must_use]
    pub fn pass_type(&self) -> &str {
        &self.pass_type
    }

    #[inline]
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[inline]
    #[must_use]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Returns `true` if this name lives under `pass_type/category`.
    #[inline]
    #[must_use]
    pub fn belongs_to(&self, pass_type: &str, category: &str) -> bool {
        self.pass_type == pass_type && self.category == category
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{:0width$}",
            self.pass_type,
            self.category,
            self.iteration,
            width = ITERATION_WIDTH
        )
    }
}

impl FromStr for Identifier {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = PassError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}
