//! Per-map settings: the raw schema as loaded, the structural checks, and
//! the validated, compiled [`MapSettings`] handed to the lookup layer.

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::pattern::{self, CompiledPattern};
use crate::types::{Scope, UnknownScope};

/// One `[map.NAME]` section, exactly as the settings source produced it.
///
/// Nothing here is checked yet; see [`validate_map`].
#[derive(Config, Serialize, Debug, Clone, PartialEq)]
pub struct RawMapSettings {
    /// Dictionary key pattern. `$name` and `${name}` mark variables, e.g.
    /// "shared/quota/$user".
    #[config(default = "")]
    pub pattern: String,

    /// Search base DN. May reference pattern variables.
    #[config(default = "")]
    pub base: String,

    /// Search filter, a parenthesized expression such as "(uid=$user)".
    #[config(default = "")]
    pub filter: String,

    /// Search scope: "base", "onelevel" or "subtree".
    #[config(default = "subtree")]
    pub scope: String,

    /// Attribute holding the username matched by the filter.
    #[config(default = "cn")]
    pub username_attribute: String,

    /// Attributes whose values form the dictionary value. Either a list or a
    /// single space separated string.
    #[config(deserialize_with = string_list, default = [])]
    pub values: Vec<String>,
}

/// Deserialize a list of names given either as an array or as one string
/// separated by whitespace or commas.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringList::deserialize(deserializer)? {
        StringList::One(s) => s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        StringList::Many(list) => list,
    })
}

/// Check one raw map. The first failing check wins.
///
/// Drops at most one trailing empty entry from `values` before testing it;
/// that is the only change made to `raw`. Returns the parsed scope.
pub fn validate_map(raw: &mut RawMapSettings) -> Result<Scope, ValidationError> {
    if !raw.filter.starts_with('(') {
        return Err(ValidationError::FilterStart);
    }
    if !raw.filter.ends_with(')') {
        return Err(ValidationError::FilterEnd);
    }
    if raw.pattern.is_empty() {
        return Err(ValidationError::PatternNotSet);
    }
    if raw.username_attribute.is_empty() {
        return Err(ValidationError::UsernameAttributeNotSet);
    }

    if raw.values.last().is_some_and(String::is_empty) {
        raw.values.pop();
    }
    if raw.values.is_empty() {
        return Err(ValidationError::ValuesNotSet);
    }

    raw.scope
        .parse()
        .map_err(|UnknownScope(token)| ValidationError::UnknownScope(token))
}

/// A validated map with its compiled pattern. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSettings {
    name: String,
    pattern: String,
    base: String,
    filter: String,
    scope_token: String,
    scope: Scope,
    username_attribute: String,
    values: Vec<String>,
    compiled: CompiledPattern,
}

impl MapSettings {
    /// Validate `raw` and compile its pattern.
    pub fn build(name: &str, mut raw: RawMapSettings) -> Result<Self, ValidationError> {
        let scope = validate_map(&mut raw)?;
        let compiled = pattern::compile(&raw.pattern);

        Ok(Self {
            name: name.to_string(),
            pattern: raw.pattern,
            base: raw.base,
            filter: raw.filter,
            scope_token: raw.scope,
            scope,
            username_attribute: raw.username_attribute,
            values: raw.values,
            compiled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The scope as written in the settings.
    pub fn scope_token(&self) -> &str {
        &self.scope_token
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn username_attribute(&self) -> &str {
        &self.username_attribute
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }
}
