use crate::error::DictLdapError;
use crate::file;
use crate::ops::{self, DictResult};
use crate::settings::{self, DictSettings};
use crate::source::{SourceInput, TomlSource};
use crate::types::{DictAction, SearchPath};

/// Builder for locating, layering and loading dict LDAP settings.
///
/// ```ignore
/// let settings = SettingsLoader::new()
///     .app_name("dict-ldap")
///     .search_paths(vec![SearchPath::Path("/etc/dovecot".into())])
///     .load()?;
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    env_prefix: Option<String>,
    env_enabled: bool,
    strict: bool,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            env_prefix: None,
            env_enabled: true,
            strict: true,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.toml"`
    /// - `search_paths` → `[SearchPath::Platform]`
    /// - `env_prefix` → `"{APP_NAME}"` (uppercased, `-` becomes `_`)
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the settings file name (default: `"{app_name}.toml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths. Later entries override earlier ones.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path, starting from `[Platform]` if none were set.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Platform])
            .push(path);
        self
    }

    /// Override the environment variable prefix.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable the environment overlay entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, unknown keys in settings files produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn effective_app_name(&self) -> Result<&str, DictLdapError> {
        self.app_name
            .as_deref()
            .ok_or(DictLdapError::AppNameRequired)
    }

    fn effective_file_name(&self) -> Result<String, DictLdapError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.toml"))
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths
            .clone()
            .unwrap_or_else(|| vec![SearchPath::Platform])
    }

    fn effective_env_prefix(&self) -> Result<Option<String>, DictLdapError> {
        if !self.env_enabled {
            return Ok(None);
        }
        if let Some(prefix) = &self.env_prefix {
            return Ok(Some(prefix.clone()));
        }
        let app = self.effective_app_name()?;
        Ok(Some(app.to_uppercase().replace('-', "_")))
    }

    /// Read the files and environment into a [`SourceInput`].
    fn build_input(&self) -> Result<SourceInput, DictLdapError> {
        let app_name = self.effective_app_name()?;
        let file_name = self.effective_file_name()?;
        let env_prefix = self.effective_env_prefix()?;

        let files =
            file::load_settings_files(&self.effective_search_paths(), &file_name, app_name)?;
        let env_vars = if env_prefix.is_some() {
            std::env::vars().collect()
        } else {
            Vec::new()
        };

        Ok(SourceInput {
            files,
            env_vars,
            env_prefix,
            strict: self.strict,
        })
    }

    /// Merge all layers into a [`TomlSource`] without assembling maps.
    pub fn source(&self) -> Result<TomlSource, DictLdapError> {
        TomlSource::resolve(self.build_input()?)
    }

    /// Load, validate and compile every declared map.
    pub fn load(&self) -> Result<DictSettings, DictLdapError> {
        settings::load(&self.source()?)
    }

    /// Handle a [`DictAction`] and print the result to stdout.
    pub fn handle_and_print(&self, action: &DictAction) -> Result<(), DictLdapError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a [`DictAction`] (check / show / gen).
    pub fn handle(&self, action: &DictAction) -> Result<DictResult, DictLdapError> {
        match action {
            DictAction::Check => Ok(ops::summarize(&self.load()?)),
            DictAction::Show { map } => ops::show_map(&self.load()?, map),
            DictAction::Gen { name, output } => {
                let template = ops::generate_template(name);
                match output {
                    Some(path) => {
                        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
                        {
                            std::fs::create_dir_all(parent).map_err(|e| DictLdapError::IoError {
                                path: parent.to_path_buf(),
                                source: e,
                            })?;
                        }
                        std::fs::write(path, &template).map_err(|e| DictLdapError::IoError {
                            path: path.clone(),
                            source: e,
                        })?;
                        Ok(DictResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(DictResult::Template(template)),
                }
            }
        }
    }
}
