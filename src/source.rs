//! Where raw settings come from.
//!
//! The assembler only talks to a [`SettingsSource`]. [`TomlSource`] is the
//! bundled implementation: it merges pre-loaded TOML files and an environment
//! overlay into one table, with no I/O of its own, so every step is testable
//! with synthetic input. Layout:
//!
//! ```toml
//! maps = ["users"]
//!
//! [map.users]
//! pattern = "priv/$user"
//! filter = "(uid=$user)"
//! values = ["mail"]
//! ```

use std::path::PathBuf;

use confique::Config;
use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::env;
use crate::error::DictLdapError;
use crate::map::RawMapSettings;
use crate::settings::DictConfig;
use crate::validate;

/// Top-level key that holds one table per map.
pub const MAP_SECTION: &str = "map";

/// Supplies backend-level settings and raw per-map settings by name.
pub trait SettingsSource {
    /// The backend-level settings, including the declared map names.
    fn dict_config(&self) -> Result<DictConfig, DictLdapError>;

    /// The raw settings of the map called `name`.
    fn map_settings(&self, name: &str) -> Result<RawMapSettings, DictLdapError>;
}

/// Everything [`TomlSource::resolve`] needs. No I/O happens there.
pub struct SourceInput {
    /// File contents in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, String)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"DICT_LDAP"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// Whether to reject unknown keys in files.
    pub strict: bool,
}

/// Settings merged from TOML files and environment variables.
#[derive(Debug, Clone, Default)]
pub struct TomlSource {
    table: Table,
}

impl TomlSource {
    /// Validate (if strict) and merge every file, then lay the env overlay on top.
    pub fn resolve(input: SourceInput) -> Result<Self, DictLdapError> {
        let mut merged = Table::new();
        for (path, content) in &input.files {
            let table: Table = toml::from_str(content).map_err(|e| DictLdapError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            if input.strict {
                validate::validate_unknown_keys(&table, content, path)?;
            }
            merge_into(&mut merged, table);
        }

        if let Some(prefix) = &input.env_prefix {
            merge_into(&mut merged, env::env_to_table(prefix, input.env_vars));
        }

        Ok(Self { table: merged })
    }

    /// A strict source built from a single TOML document.
    pub fn from_toml(content: &str) -> Result<Self, DictLdapError> {
        Self::resolve(SourceInput {
            files: vec![(PathBuf::from("<inline>"), content.to_string())],
            env_vars: vec![],
            env_prefix: None,
            strict: true,
        })
    }

    fn map_sections(&self) -> Option<&Table> {
        self.table.get(MAP_SECTION).and_then(Value::as_table)
    }
}

impl SettingsSource for TomlSource {
    fn dict_config(&self) -> Result<DictConfig, DictLdapError> {
        let mut top = self.table.clone();
        top.remove(MAP_SECTION);
        from_table(top, "<top level>")
    }

    fn map_settings(&self, name: &str) -> Result<RawMapSettings, DictLdapError> {
        let key = format!("{MAP_SECTION}.{name}");
        match self.map_sections().and_then(|maps| maps.get(name)) {
            None => Err(DictLdapError::MapNotFound(name.to_string())),
            Some(Value::Table(section)) => from_table(section.clone(), &key),
            Some(_) => Err(DictLdapError::InvalidValue {
                key,
                reason: "expected a table".into(),
            }),
        }
    }
}

/// Deserialize `table` into `C::Layer` and let confique fill in defaults.
fn from_table<C: Config>(table: Table, key: &str) -> Result<C, DictLdapError>
where
    C::Layer: DeserializeOwned,
{
    let layer: C::Layer =
        Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| DictLdapError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(DictLdapError::from)
}

/// Overlay `overlay` onto `base`. Tables present on both sides merge
/// recursively; any other value from `overlay` replaces the old one.
fn merge_into(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let Value::Table(incoming) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                merge_into(existing, incoming);
                continue;
            }
            base.insert(key, Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::TWO_MAPS;

    fn input(files: &[(&str, &str)]) -> SourceInput {
        SourceInput {
            files: files
                .iter()
                .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                .collect(),
            env_vars: vec![],
            env_prefix: None,
            strict: true,
        }
    }

    #[test]
    fn declared_names_in_order() {
        let source = TomlSource::from_toml(TWO_MAPS).unwrap();
        assert_eq!(source.dict_config().unwrap().maps, ["users", "quota"]);
    }

    #[test]
    fn map_section_with_defaults() {
        let source = TomlSource::from_toml(TWO_MAPS).unwrap();
        let users = source.map_settings("users").unwrap();
        assert_eq!(users.pattern, "priv/$user");
        assert_eq!(users.filter, "(uid=$user)");
        assert_eq!(users.scope, "subtree");
        assert_eq!(users.username_attribute, "cn");
        assert_eq!(users.values, ["mail"]);
    }

    #[test]
    fn string_values_are_split() {
        let source = TomlSource::from_toml(TWO_MAPS).unwrap();
        let quota = source.map_settings("quota").unwrap();
        assert_eq!(quota.values, ["quotaStorage", "quotaMessages"]);
        assert_eq!(quota.scope, "onelevel");
    }

    #[test]
    fn maps_may_be_one_string() {
        let source = TomlSource::from_toml("maps = \"a b\"\n").unwrap();
        assert_eq!(source.dict_config().unwrap().maps, ["a", "b"]);
    }

    #[test]
    fn no_maps_key_means_empty_list() {
        let source = TomlSource::from_toml("").unwrap();
        assert!(source.dict_config().unwrap().maps.is_empty());
    }

    #[test]
    fn missing_section_is_not_found() {
        let source = TomlSource::from_toml("maps = [\"ghost\"]\n").unwrap();
        let err = source.map_settings("ghost").unwrap_err();
        assert!(matches!(err, DictLdapError::MapNotFound(ref n) if n == "ghost"));
    }

    #[test]
    fn non_table_section_is_invalid() {
        let source = TomlSource::resolve(SourceInput {
            strict: false,
            ..input(&[("a.toml", "[map]\nusers = 3\n")])
        })
        .unwrap();
        let err = source.map_settings("users").unwrap_err();
        assert!(matches!(err, DictLdapError::InvalidValue { ref key, .. } if key == "map.users"));
    }

    #[test]
    fn wrong_type_is_invalid_value() {
        let source = TomlSource::resolve(SourceInput {
            strict: false,
            ..input(&[("a.toml", "[map.users]\npattern = 5\n")])
        })
        .unwrap();
        let err = source.map_settings("users").unwrap_err();
        match err {
            DictLdapError::InvalidValue { key, .. } => assert_eq!(key, "map.users"),
            other => panic!("Expected InvalidValue, got: {other:?}"),
        }
    }

    #[test]
    fn later_file_overrides_earlier_per_key() {
        let source = TomlSource::resolve(input(&[
            (
                "base.toml",
                "maps = [\"users\"]\n[map.users]\npattern = \"priv/$user\"\nfilter = \"(uid=$user)\"\n",
            ),
            ("local.toml", "[map.users]\nfilter = \"(mail=$user)\"\n"),
        ]))
        .unwrap();
        let users = source.map_settings("users").unwrap();
        assert_eq!(users.pattern, "priv/$user");
        assert_eq!(users.filter, "(mail=$user)");
    }

    #[test]
    fn env_overrides_files() {
        let source = TomlSource::resolve(SourceInput {
            env_vars: vec![
                ("DICT__MAP__USERS__SCOPE".into(), "base".into()),
                ("DICT__MAPS".into(), "users".into()),
            ],
            env_prefix: Some("DICT".into()),
            ..input(&[("a.toml", "[map.users]\nscope = \"subtree\"\n")])
        })
        .unwrap();
        assert_eq!(source.map_settings("users").unwrap().scope, "base");
        assert_eq!(source.dict_config().unwrap().maps, ["users"]);
    }

    #[test]
    fn strict_rejects_wrong_types_up_front() {
        let err = TomlSource::from_toml("[map.users]\npattern = 5\n").unwrap_err();
        assert!(matches!(err, DictLdapError::ParseError { .. }));
    }

    #[test]
    fn strict_rejects_unknown_keys() {
        let err = TomlSource::from_toml("[map.users]\nfitler = \"(x)\"\n").unwrap_err();
        assert!(matches!(err, DictLdapError::UnknownKeys(_)));
    }

    #[test]
    fn lenient_mode_ignores_unknown_keys() {
        let source = TomlSource::resolve(SourceInput {
            strict: false,
            ..input(&[("a.toml", "other_tool = true\n[map.users]\nfitler = \"(x)\"\n")])
        })
        .unwrap();
        assert_eq!(source.map_settings("users").unwrap().filter, "");
    }

    #[test]
    fn parse_error_names_file() {
        let err = TomlSource::resolve(input(&[("broken.toml", "maps = [")])).unwrap_err();
        match err {
            DictLdapError::ParseError { path, .. } => assert_eq!(path, PathBuf::from("broken.toml")),
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn merge_replaces_scalars_and_recurses_into_tables() {
        let mut base: Table = "a = 1\n[t]\nx = 1\ny = 2\n".parse().unwrap();
        let overlay: Table = "a = \"s\"\n[t]\ny = 3\n".parse().unwrap();
        merge_into(&mut base, overlay);
        assert_eq!(base["a"].as_str(), Some("s"));
        assert_eq!(base["t"]["x"].as_integer(), Some(1));
        assert_eq!(base["t"]["y"].as_integer(), Some(3));
    }
}
