use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Service URLs are non-empty http(s) URLs
/// - Credentials are present
/// - Awaiting-tracking tag id is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    check_url("platform.url", &config.platform.url)?;
    check_url("meyer.url", &config.meyer.url)?;
    check_url("taw.url", &config.taw.url)?;

    check_present("platform.username", &config.platform.username)?;
    check_present("platform.password", &config.platform.password)?;
    check_present("meyer.auth", &config.meyer.auth)?;
    check_present("taw.username", &config.taw.username)?;
    check_present("taw.password", &config.taw.password)?;

    if config.platform.awaiting_tracking_tag_id == 0 {
        return Err(ConfigError::ValidationError(
            "platform.awaiting_tracking_tag_id cannot be 0".to_string(),
        ));
    }

    if config.platform.page_limit == 0 {
        return Err(ConfigError::ValidationError(
            "platform.page_limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn check_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got '{}'",
            key, value
        )));
    }
    Ok(())
}

fn check_present(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            key
        )));
    }
    Ok(())
}
