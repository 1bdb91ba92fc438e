//! Small shared types: search locations, directory search scope, and the
//! framework-agnostic actions the CLI adapter produces.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

/// Where to search for settings files.
///
/// Paths are listed in **priority-ascending** order: a file found in a later
/// location overrides keys from earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".dovecot")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// Directory search depth for a map's query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only the entry named by the base DN.
    Base,
    /// Immediate children of the base DN.
    OneLevel,
    /// The base DN and everything below it.
    #[default]
    Subtree,
}

impl Scope {
    /// The configuration token for this scope.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Base => "base",
            Scope::OneLevel => "onelevel",
            Scope::Subtree => "subtree",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a scope token is not one of `base`, `onelevel`, `subtree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "base" => Ok(Scope::Base),
            "onelevel" => Ok(Scope::OneLevel),
            "subtree" => Ok(Scope::Subtree),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// A settings operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum DictAction {
    /// Load every map and summarize the compiled patterns.
    Check,
    /// Show every field of one declared map.
    Show { map: String },
    /// Generate a commented `[map.NAME]` template for the map called `name`.
    Gen {
        name: String,
        output: Option<PathBuf>,
    },
}
