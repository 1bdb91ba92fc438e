use std::path::PathBuf;
use thiserror::Error;

/// A structural problem in one map's settings. Each variant names the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("filter must start with '('")]
    FilterStart,

    #[error("filter must end with ')'")]
    FilterEnd,

    #[error("pattern not set")]
    PatternNotSet,

    #[error("username_attribute not set")]
    UsernameAttributeNotSet,

    #[error("values not set")]
    ValuesNotSet,

    #[error("Unknown scope: {0}")]
    UnknownScope(String),
}

impl ValidationError {
    /// The settings key the check applies to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::FilterStart | ValidationError::FilterEnd => "filter",
            ValidationError::PatternNotSet => "pattern",
            ValidationError::UsernameAttributeNotSet => "username_attribute",
            ValidationError::ValuesNotSet => "values",
            ValidationError::UnknownScope(_) => "scope",
        }
    }
}

#[derive(Debug, Error)]
pub enum DictLdapError {
    #[error("no dict maps declared")]
    NoMaps,

    #[error("dict map '{0}' declared more than once")]
    DuplicateMap(String),

    #[error("no settings section for dict map '{0}'")]
    MapNotFound(String),

    #[error("Failed to get dict map {name}: {source}")]
    MapRetrieval {
        name: String,
        source: Box<DictLdapError>,
    },

    #[error("Invalid dict map {name}: {source}")]
    InvalidMap {
        name: String,
        source: ValidationError,
    },

    #[error("Dict map '{0}' is not declared")]
    MapNotDeclared(String),

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file")]
    UnknownKeys(Vec<DictLdapError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("App name is required: call .app_name() on the loader")]
    AppNameRequired,
}

impl DictLdapError {
    /// The map this error is about, when it concerns a single map.
    pub fn map_name(&self) -> Option<&str> {
        match self {
            DictLdapError::DuplicateMap(name)
            | DictLdapError::MapNotFound(name)
            | DictLdapError::MapNotDeclared(name)
            | DictLdapError::MapRetrieval { name, .. }
            | DictLdapError::InvalidMap { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_formats_correctly() {
        let err = DictLdapError::UnknownKey {
            key: "map.users.fitler".into(),
            path: "/etc/dovecot/dict-ldap.toml".into(),
            line: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("map.users.fitler"));
        assert!(msg.contains("dict-ldap.toml"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn retrieval_failure_names_map_and_cause() {
        let err = DictLdapError::MapRetrieval {
            name: "quota".into(),
            source: Box::new(DictLdapError::MapNotFound("quota".into())),
        };
        assert_eq!(
            err.to_string(),
            "Failed to get dict map quota: no settings section for dict map 'quota'"
        );
        assert_eq!(err.map_name(), Some("quota"));
    }

    #[test]
    fn invalid_map_names_map_and_field() {
        let err = DictLdapError::InvalidMap {
            name: "users".into(),
            source: ValidationError::FilterStart,
        };
        let msg = err.to_string();
        assert!(msg.contains("users"));
        assert!(msg.contains("filter must start with '('"));
    }

    #[test]
    fn unknown_scope_includes_token() {
        let err = ValidationError::UnknownScope("sub".into());
        assert_eq!(err.to_string(), "Unknown scope: sub");
        assert_eq!(err.field(), "scope");
    }

    #[test]
    fn every_validation_error_names_its_field() {
        let all = [
            ValidationError::FilterStart,
            ValidationError::FilterEnd,
            ValidationError::PatternNotSet,
            ValidationError::UsernameAttributeNotSet,
            ValidationError::ValuesNotSet,
            ValidationError::UnknownScope("x".into()),
        ];
        for err in all {
            assert!(
                err.to_string().to_lowercase().contains(err.field()),
                "{err} does not mention {}",
                err.field()
            );
        }
    }

    #[test]
    fn app_name_required_formats() {
        assert!(DictLdapError::AppNameRequired.to_string().contains("app_name"));
    }
}
