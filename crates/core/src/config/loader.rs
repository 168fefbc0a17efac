use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Settings, ConfigError};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "tubearchive.toml";

/// Environment prefix for overrides, e.g. `TUBEARCHIVE_HTTP__TIMEOUT_SECS=10`.
const ENV_PREFIX: &str = "TUBEARCHIVE_";

/// Load settings with environment variable overrides.
///
/// An explicitly requested file must exist. Without one, `tubearchive.toml`
/// in the working directory is used when present and defaults otherwise.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            figment = figment.merge(Toml::file(path));
        }
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                figment = figment.merge(Toml::file(default_path));
            }
        }
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load settings from a TOML string (useful for testing)
pub fn load_settings_from_str(toml_str: &str) -> Result<Settings, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_settings_from_str_valid() {
        let toml = r#"
[redownload]
requests_per_minute = 30
"#;
        let settings = load_settings_from_str(toml).unwrap();
        assert_eq!(settings.redownload.requests_per_minute, 30);
    }

    #[test]
    fn test_load_settings_from_str_invalid() {
        let result = load_settings_from_str("[http\ntimeout_secs = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_settings_file_not_found() {
        let result = load_settings(Some(Path::new("/nonexistent/tubearchive.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[database]
path = "/tmp/archive.sqlite"

[http]
timeout_secs = 5
"#
        )
        .unwrap();

        let settings = load_settings(Some(temp_file.path())).unwrap();
        assert_eq!(settings.database.path.to_str().unwrap(), "/tmp/archive.sqlite");
        assert_eq!(settings.http.timeout_secs, 5);
        assert!(settings.http.accept_invalid_certs); // default kept
    }
}
