//! Settings operations: summaries, single-map display, template generation,
//! and the result type callers print.

use std::fmt;
use std::path::PathBuf;

use crate::error::DictLdapError;
use crate::map::{MapSettings, RawMapSettings};
use crate::settings::DictSettings;
use crate::source::MAP_SECTION;

/// One line of a [`DictResult::Summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapSummary {
    pub name: String,
    pub skeleton: String,
    pub variables: Vec<String>,
}

/// Result of a settings operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum DictResult {
    /// Every map loaded; one entry per map in declaration order.
    Summary { maps: Vec<MapSummary> },
    /// All fields of one map.
    Map(Box<MapSettings>),
    /// A generated TOML template string.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
}

impl fmt::Display for DictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictResult::Summary { maps } => {
                writeln!(f, "{} dict map(s) OK", maps.len())?;
                for m in maps {
                    writeln!(f, "{}: {} [{}]", m.name, m.skeleton, m.variables.join(", "))?;
                }
                Ok(())
            }
            DictResult::Map(map) => {
                writeln!(f, "[{MAP_SECTION}.{}]", map.name())?;
                writeln!(f, "pattern = {}", map.pattern())?;
                writeln!(f, "base = {}", map.base())?;
                writeln!(f, "filter = {}", map.filter())?;
                writeln!(f, "scope = {}", map.scope())?;
                writeln!(f, "username_attribute = {}", map.username_attribute())?;
                writeln!(f, "values = {}", map.values().join(" "))?;
                writeln!(f, "# skeleton = {}", map.compiled().skeleton())?;
                write!(f, "# variables = {}", map.compiled().variables().join(", "))
            }
            DictResult::Template(t) => write!(f, "{t}"),
            DictResult::TemplateWritten { path } => {
                write!(f, "Map template written to {}", path.display())
            }
        }
    }
}

/// Summarize every compiled map.
pub fn summarize(settings: &DictSettings) -> DictResult {
    let maps = settings
        .iter()
        .map(|map| MapSummary {
            name: map.name().to_string(),
            skeleton: map.compiled().skeleton().to_string(),
            variables: map.compiled().variables().to_vec(),
        })
        .collect();
    DictResult::Summary { maps }
}

/// Look up one declared map.
pub fn show_map(settings: &DictSettings, name: &str) -> Result<DictResult, DictLdapError> {
    settings
        .get(name)
        .map(|map| DictResult::Map(Box::new(map.clone())))
        .ok_or_else(|| DictLdapError::MapNotDeclared(name.to_string()))
}

/// Generate a commented `[map.NAME]` section from the schema's doc comments.
pub fn generate_template(name: &str) -> String {
    let body = confique::toml::template::<RawMapSettings>(confique::toml::FormatOptions::default());
    format!(
        "# Add \"{name}\" to the top-level `maps` list.\n[{MAP_SECTION}.{name}]\n{body}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::TWO_MAPS;
    use crate::settings::load;
    use crate::source::TomlSource;

    fn settings() -> DictSettings {
        load(&TomlSource::from_toml(TWO_MAPS).unwrap()).unwrap()
    }

    #[test]
    fn summary_lists_maps_in_order() {
        let result = summarize(&settings());
        let DictResult::Summary { maps } = &result else {
            panic!("Expected Summary, got: {result:?}");
        };
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].name, "users");
        assert_eq!(maps[1].skeleton, "shared/quota/$@$");
        assert_eq!(maps[1].variables, ["user", "domain"]);
    }

    #[test]
    fn summary_display() {
        let text = summarize(&settings()).to_string();
        assert!(text.starts_with("2 dict map(s) OK"));
        assert!(text.contains("users: priv/$ [user]"));
        assert!(text.contains("quota: shared/quota/$@$ [user, domain]"));
    }

    #[test]
    fn show_known_map() {
        let text = show_map(&settings(), "quota").unwrap().to_string();
        assert!(text.starts_with("[map.quota]"));
        assert!(text.contains("scope = onelevel"));
        assert!(text.contains("values = quotaStorage quotaMessages"));
    }

    #[test]
    fn show_undeclared_map() {
        let err = show_map(&settings(), "nope").unwrap_err();
        assert!(matches!(err, DictLdapError::MapNotDeclared(ref n) if n == "nope"));
    }

    #[test]
    fn template_mentions_every_field() {
        let template = generate_template("users");
        assert!(template.contains("[map.users]"));
        for field in ["pattern", "base", "filter", "scope", "username_attribute", "values"] {
            assert!(template.contains(field), "template is missing {field}");
        }
    }
}
