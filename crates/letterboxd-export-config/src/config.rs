use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("config file {path} has no [auth] section")]
    MissingSection { path: PathBuf },
    #[error("missing the following config values: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

/// Connection settings for the Plex server, read from the `[auth]` section
/// of an INI file. `baseurl` and `token` are required; `library` optionally
/// names the section the web surface exports from.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    pub token: String,
    pub library: Option<String>,
}

impl AuthConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let auth = ini
            .section(Some("auth"))
            .ok_or_else(|| ConfigError::MissingSection {
                path: path.to_path_buf(),
            })?;

        let mut missing = Vec::new();
        for key in ["baseurl", "token"] {
            if auth.get(key).map(str::trim).unwrap_or_default().is_empty() {
                missing.push(key.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        Ok(Self {
            base_url: auth.get("baseurl").unwrap_or_default().trim().to_string(),
            token: auth.get("token").unwrap_or_default().trim().to_string(),
            library: auth
                .get("library")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    /// Section name the web surface exports from when the config does not
    /// name one.
    pub fn library_or_default(&self) -> &str {
        self.library.as_deref().unwrap_or("Movies")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_load_complete_config() {
        let file = write_config(
            "[auth]\nbaseurl = http://localhost:32400\ntoken = abc123\nlibrary = Tower Movies\n",
        );

        let config = AuthConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:32400");
        assert_eq!(config.token, "abc123");
        assert_eq!(config.library.as_deref(), Some("Tower Movies"));
        assert_eq!(config.library_or_default(), "Tower Movies");
    }

    #[test]
    fn test_library_defaults_to_movies() {
        let file = write_config("[auth]\nbaseurl = http://localhost:32400\ntoken = abc123\n");

        let config = AuthConfig::load(file.path()).unwrap();
        assert_eq!(config.library, None);
        assert_eq!(config.library_or_default(), "Movies");
    }

    #[test]
    fn test_missing_keys_are_named() {
        let file = write_config("[auth]\nbaseurl = http://localhost:32400\n");

        let err = AuthConfig::load(file.path()).unwrap_err();
        match err {
            ConfigError::MissingKeys(keys) => assert_eq!(keys, vec!["token".to_string()]),
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_both_keys() {
        let file = write_config("[auth]\nother = value\n");

        let err = AuthConfig::load(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing the following config values: baseurl, token"
        );
    }

    #[test]
    fn test_missing_auth_section() {
        let file = write_config("[server]\nbaseurl = http://localhost:32400\n");

        let err = AuthConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { .. }));
    }
}
