//! Backend-level settings: the declared map list, the assembly pass that
//! turns it into validated maps, and the [`load`] entry point.
//!
//! Assembly is all-or-nothing. Maps are built into a local vector that only
//! becomes a [`DictSettings`] once every declared map has passed, so a failed
//! load drops everything it allocated and hands back just the error.

use std::collections::HashSet;

use confique::Config;
use serde::Serialize;

use crate::error::DictLdapError;
use crate::map::{MapSettings, string_list};
use crate::source::SettingsSource;

/// Backend-level settings as loaded from the source.
#[derive(Config, Serialize, Debug, Clone, PartialEq)]
pub struct DictConfig {
    /// Names of the maps this backend serves, in lookup order. Each name
    /// needs a matching `[map.NAME]` section.
    #[config(deserialize_with = string_list, default = [])]
    pub maps: Vec<String>,
}

/// Every declared map, validated and compiled.
///
/// Only ever constructed fully valid: there is at least one map, and
/// `maps()[i]` is the map named `map_names()[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictSettings {
    map_names: Vec<String>,
    maps: Vec<MapSettings>,
}

impl DictSettings {
    /// Declared map names, in declaration order.
    pub fn map_names(&self) -> &[String] {
        &self.map_names
    }

    /// Validated maps, index-aligned with [`map_names`](Self::map_names).
    pub fn maps(&self) -> &[MapSettings] {
        &self.maps
    }

    pub fn get(&self, name: &str) -> Option<&MapSettings> {
        self.maps.iter().find(|map| map.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MapSettings> {
        self.maps.iter()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Never true for settings returned by [`load`] or [`assemble`].
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl<'a> IntoIterator for &'a DictSettings {
    type Item = &'a MapSettings;
    type IntoIter = std::slice::Iter<'a, MapSettings>;

    fn into_iter(self) -> Self::IntoIter {
        self.maps.iter()
    }
}

/// Fetch, validate and compile every map in `map_names`.
///
/// Fails on an empty or repeated name list, on the first map the source
/// cannot produce, and on the first map that does not validate.
pub fn assemble<S>(source: &S, map_names: &[String]) -> Result<DictSettings, DictLdapError>
where
    S: SettingsSource + ?Sized,
{
    if map_names.is_empty() {
        return Err(DictLdapError::NoMaps);
    }

    let mut seen = HashSet::with_capacity(map_names.len());
    if let Some(dup) = map_names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(DictLdapError::DuplicateMap(dup.clone()));
    }

    let mut maps = Vec::with_capacity(map_names.len());
    for name in map_names {
        let raw = source
            .map_settings(name)
            .map_err(|e| DictLdapError::MapRetrieval {
                name: name.clone(),
                source: Box::new(e),
            })?;

        let map = MapSettings::build(name, raw).map_err(|e| DictLdapError::InvalidMap {
            name: name.clone(),
            source: e,
        })?;

        if map.compiled().has_empty_variable() {
            tracing::warn!(
                map = %name,
                pattern = map.pattern(),
                "Dict map pattern has a placeholder without a name"
            );
        }
        tracing::debug!(
            map = %name,
            skeleton = map.compiled().skeleton(),
            variables = map.compiled().variables().len(),
            "Compiled dict map"
        );
        maps.push(map);
    }

    Ok(DictSettings {
        map_names: map_names.to_vec(),
        maps,
    })
}

/// Load backend settings from `source` and assemble its declared maps.
pub fn load<S>(source: &S) -> Result<DictSettings, DictLdapError>
where
    S: SettingsSource + ?Sized,
{
    let config = source.dict_config()?;
    let settings = assemble(source, &config.maps)?;
    tracing::info!(maps = settings.len(), "Loaded dict ldap settings");
    Ok(settings)
}
