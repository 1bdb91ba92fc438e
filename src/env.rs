//! Environment overlay: `{PREFIX}__*` variables as a nested `toml::Table`.
//!
//! `DICT_LDAP__MAPS="users quota"` sets the declared map list and
//! `DICT_LDAP__MAP__USERS__SCOPE=base` sets `map.users.scope`. Every settings
//! value is a string (lists accept the space separated form), so values are
//! kept verbatim.

use toml::{Table, Value};

/// Build a table from environment variables matching `{prefix}__*`.
///
/// Double underscore `__` separates nesting levels. Single `_` within a
/// segment is literal. Segments are lowercased, which means map names set
/// through the environment must be lowercase in the files too.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        if segments.iter().any(String::is_empty) {
            continue;
        }
        insert_path(&mut table, &segments, value);
    }

    table
}

fn insert_path(table: &mut Table, segments: &[String], value: String) {
    let (leaf, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = table;
    for segment in parents {
        let entry = current
            .entry(segment.as_str())
            .or_insert_with(|| Value::Table(Table::new()));
        match entry {
            Value::Table(sub) => current = sub,
            // A scalar already sits where a section is needed; the deeper key loses.
            _ => return,
        }
    }
    current.insert(leaf.clone(), Value::String(value));
}
