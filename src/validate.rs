//! Strict-mode validation: detect unknown keys in settings files.
//!
//! The top level is checked against [`DictConfig`] and each `[map.NAME]`
//! section against [`RawMapSettings`]. `serde_ignored` reports every key the
//! confique layer type doesn't consume; each one is reported with its file
//! path and best-effort line number.

use std::path::Path;

use confique::Config;
use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::error::DictLdapError;
use crate::map::RawMapSettings;
use crate::settings::DictConfig;
use crate::source::MAP_SECTION;

/// Validate that a parsed settings file contains only known keys.
///
/// `content` is the file text the table was parsed from; it is only used to
/// locate line numbers.
pub fn validate_unknown_keys(
    table: &Table,
    content: &str,
    path: &Path,
) -> Result<(), DictLdapError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let mut top = table.clone();
    let sections = top.remove(MAP_SECTION);
    collect_unknown::<DictConfig>(Value::Table(top), "", path, &mut unknown_keys)?;

    match sections {
        None => {}
        Some(Value::Table(maps)) => {
            for (name, section) in maps {
                let prefix = format!("{MAP_SECTION}.{name}.");
                collect_unknown::<RawMapSettings>(section, &prefix, path, &mut unknown_keys)?;
            }
        }
        Some(_) => {
            return Err(DictLdapError::InvalidValue {
                key: MAP_SECTION.into(),
                reason: format!("expected a table of map sections in {}", path.display()),
            });
        }
    }

    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors: Vec<DictLdapError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            DictLdapError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(DictLdapError::UnknownKeys(errors))
}

/// Deserialize `value` into `C::Layer`, recording every ignored key under `prefix`.
fn collect_unknown<C: Config>(
    value: Value,
    prefix: &str,
    path: &Path,
    unknown_keys: &mut Vec<String>,
) -> Result<(), DictLdapError>
where
    C::Layer: DeserializeOwned,
{
    let _layer: C::Layer = serde_ignored::deserialize(value, |ignored| {
        unknown_keys.push(format!("{prefix}{ignored}"));
    })
    .map_err(|e| DictLdapError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Find the 1-indexed line of a dotted key such as `map.users.fitler`.
///
/// Tracks the current `[section]` header and only matches the leaf key when
/// inside the section formed by the other segments. Does not understand
/// quoted keys, dotted assignments or inline tables. Returns 0 when the key
/// cannot be located.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let Some((section, leaf)) = dotted_key.rsplit_once('.') else {
        return find_in_section(content, &[], dotted_key);
    };
    let expected: Vec<&str> = section.split('.').collect();
    find_in_section(content, &expected, leaf)
}

fn find_in_section(content: &str, expected: &[&str], leaf: &str) -> usize {
    let mut current: Vec<String> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed
            .strip_prefix('[')
            .filter(|rest| !rest.starts_with('['))
        {
            // Anything after the closing bracket is a comment.
            let header = header.split_once(']').map_or(header, |(name, _)| name).trim();
            current = header.split('.').map(|s| s.trim().to_string()).collect();
            continue;
        }

        if current.iter().map(String::as_str).eq(expected.iter().copied())
            && let Some(after_key) = trimmed.strip_prefix(leaf)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
