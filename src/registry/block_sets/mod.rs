//! Bundled block sets.
//!
//! Each set is an ordinary [`Registry`]; the editor swaps sets by replacing the
//! registry value and clearing the graph built against the old one.

use super::Registry;
use crate::error::RegistryError;
use std::fmt;
use std::str::FromStr;

mod css;
mod html;
mod javascript;

/// The block sets shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSet {
    JavaScript,
    Html,
    Css,
}

impl BlockSet {
    pub const ALL: [BlockSet; 3] = [BlockSet::JavaScript, BlockSet::Html, BlockSet::Css];

    pub fn name(&self) -> &'static str {
        match self {
            BlockSet::JavaScript => "javascript",
            BlockSet::Html => "html",
            BlockSet::Css => "css",
        }
    }

    /// Builds a fresh registry for this block set.
    pub fn load(&self) -> Result<Registry, RegistryError> {
        match self {
            BlockSet::JavaScript => javascript::registry(),
            BlockSet::Html => html::registry(),
            BlockSet::Css => css::registry(),
        }
    }
}

impl fmt::Display for BlockSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockSet {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(BlockSet::JavaScript),
            "html" => Ok(BlockSet::Html),
            "css" => Ok(BlockSet::Css),
            other => Err(RegistryError::UnknownBlockSet(other.to_string())),
        }
    }
}
