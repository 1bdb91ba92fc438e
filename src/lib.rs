//! Validated, compiled map settings for an LDAP-backed dictionary backend.
//!
//! A dict backend instance declares one or more named **maps**. Each map
//! ties a dictionary key pattern such as `shared/quota/$user` to an LDAP
//! search: a base DN, a filter, a scope, the attribute carrying the username
//! and the attributes whose values form the dictionary value. This crate
//! takes those settings from a [`SettingsSource`], checks every map, compiles
//! each key pattern, and hands back one immutable [`DictSettings`].
//!
//! ```ignore
//! let settings = SettingsLoader::new()
//!     .app_name("dict-ldap")
//!     .search_paths(vec![SearchPath::Path("/etc/dovecot".into())])
//!     .load()?;
//!
//! for map in &settings {
//!     println!("{} -> {}", map.name(), map.compiled().skeleton());
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! load(source)
//!   source.dict_config()            declared map names
//!   assemble(source, names)
//!     source.map_settings(name)     RawMapSettings
//!     validate_map(raw)             structural checks, scope parse
//!     pattern::compile(pattern)     skeleton + variable names
//!   -> DictSettings                 every map, or the first error
//! ```
//!
//! Loading is all-or-nothing. The first missing or invalid map aborts the
//! load and nothing partially built is returned; there is no shared state
//! between loads, so concurrent reloads each get their own tree.
//!
//! # Patterns
//!
//! `$name` runs over ASCII letters, digits and `_`; `${name}` runs to the
//! closing brace. Both become a single `$` in the compiled skeleton, and
//! [`CompiledPattern::variables`] lists the names in marker order:
//!
//! | pattern | skeleton | variables |
//! |---------|----------|-----------|
//! | `$user` | `$` | `user` |
//! | `${user}@${domain}` | `$@$` | `user`, `domain` |
//! | `cn=$a,dc=$a` | `cn=$,dc=$` | `a`, `a` |
//!
//! A `${` with no closing brace consumes the rest of the pattern and yields
//! an empty name. The load still succeeds but a warning is logged.
//!
//! # Checks
//!
//! Per map, in order, stopping at the first failure: `filter` starts with
//! `(`, `filter` ends with `)`, `pattern` is set, `username_attribute` is
//! set, `values` is non-empty (one trailing empty entry is ignored), and
//! `scope` is one of `base`, `onelevel`, `subtree`.
//!
//! # TOML settings
//!
//! [`TomlSource`] reads this layout, deep-merging several files and an
//! environment overlay (`DICT_LDAP__MAP__USERS__SCOPE=base`):
//!
//! ```toml
//! maps = ["users"]
//!
//! [map.users]
//! pattern = "priv/$user"
//! filter = "(uid=$user)"
//! base = "ou=people,dc=example,dc=com"
//! scope = "subtree"
//! username_attribute = "cn"
//! values = ["mail"]
//! ```
//!
//! Strict mode (on by default) rejects unknown keys with the file path, key
//! and line number. Hosts whose settings live elsewhere implement
//! [`SettingsSource`] themselves and call [`load`].
//!
//! # Error handling
//!
//! All fallible operations return [`DictLdapError`]. Messages name the map
//! and the field at fault, and scope errors quote the offending token.

pub mod error;
pub mod pattern;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod file;
mod map;
mod ops;
mod settings;
mod source;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::SettingsLoader;
#[cfg(feature = "clap")]
pub use cli::{CheckArgs, CheckSubcommand};
pub use error::{DictLdapError, ValidationError};
pub use map::{MapSettings, RawMapSettings, validate_map};
pub use ops::{DictResult, MapSummary};
pub use pattern::{CompiledPattern, compile};
pub use settings::{DictConfig, DictSettings, assemble, load};
pub use source::{MAP_SECTION, SettingsSource, SourceInput, TomlSource};
pub use types::{DictAction, Scope, SearchPath, UnknownScope};
