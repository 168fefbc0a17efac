use super::{types::Settings, ConfigError};

/// Validate settings
/// Currently validates:
/// - HTTP timeout is not 0
/// - Redownload rate is not 0
/// - Database path is not empty
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.http.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "http.timeout_secs cannot be 0".to_string(),
        ));
    }

    if settings.redownload.requests_per_minute == 0 {
        return Err(ConfigError::ValidationError(
            "redownload.requests_per_minute cannot be 0".to_string(),
        ));
    }

    if settings.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
