//! Settings file discovery and loading.
//!
//! Each [`SearchPath`] resolves to one directory, which is checked for
//! `{dir}/{file_name}`. Every file found is returned in priority order so the
//! source can deep-merge them, later files overriding earlier ones. Missing
//! files are skipped; other I/O errors (permissions, a directory where the
//! file should be) are propagated.

use std::path::{Path, PathBuf};

use crate::error::DictLdapError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` picks the platform directory (e.g. `~/.config/{app_name}/` on
/// Linux). Returns `None` if the location cannot be determined, such as when
/// there is no home directory.
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Read `file_name` from every resolvable search path that has it.
pub fn load_settings_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
) -> Result<Vec<(PathBuf, String)>, DictLdapError> {
    let mut files = Vec::new();
    for sp in search_paths {
        let Some(dir) = resolve_search_path(sp, app_name) else {
            tracing::debug!(search_path = ?sp, "Search path not resolvable, skipping");
            continue;
        };
        let path = dir.join(file_name);
        if let Some(content) = read_if_exists(&path)? {
            tracing::debug!(path = %path.display(), "Loaded settings file");
            files.push((path, content));
        }
    }
    Ok(files)
}

fn read_if_exists(path: &Path) -> Result<Option<String>, DictLdapError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DictLdapError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
