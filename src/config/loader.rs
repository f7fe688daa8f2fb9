//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CareSyncConfig;
use crate::config::secret_string;
use crate::domain::errors::CareSyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CareSyncConfig`]
/// 4. Applies environment variable overrides (`CARESYNC_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use caresync::config::load_config;
///
/// let config = load_config("caresync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CareSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CareSyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CareSyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CareSyncConfig = toml::from_str(&contents)
        .map_err(|e| CareSyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        CareSyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Returns an error when a referenced
/// variable is not set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CareSyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `CARESYNC_*` prefix
///
/// Supported overrides: `CARESYNC_LOG_LEVEL`, `CARESYNC_FHIR_BASE_URL`,
/// `CARESYNC_FHIR_TOKEN_URL`, `CARESYNC_FHIR_CLIENT_ID`,
/// `CARESYNC_FHIR_CLIENT_SECRET`, `CARESYNC_STORE_PATH`.
fn apply_env_overrides(config: &mut CareSyncConfig) {
    if let Ok(value) = std::env::var("CARESYNC_LOG_LEVEL") {
        config.application.log_level = value;
    }
    if let Ok(value) = std::env::var("CARESYNC_FHIR_BASE_URL") {
        config.fhir.base_url = value;
    }
    if let Ok(value) = std::env::var("CARESYNC_FHIR_TOKEN_URL") {
        config.fhir.token_url = value;
    }
    if let Ok(value) = std::env::var("CARESYNC_FHIR_CLIENT_ID") {
        config.fhir.client_id = value;
    }
    if let Ok(value) = std::env::var("CARESYNC_FHIR_CLIENT_SECRET") {
        config.fhir.client_secret = secret_string(value);
    }
    if let Ok(value) = std::env::var("CARESYNC_STORE_PATH") {
        config.store.path = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_env_vars_present() {
        std::env::set_var("CARESYNC_TEST_SUBST_VAR", "substituted");
        let input = "value = \"${CARESYNC_TEST_SUBST_VAR}\"";
        let output = substitute_env_vars(input).unwrap();
        assert!(output.contains("substituted"));
        std::env::remove_var("CARESYNC_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let input = "value = \"${CARESYNC_TEST_DEFINITELY_UNSET}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err
            .to_string()
            .contains("CARESYNC_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${CARESYNC_TEST_DEFINITELY_UNSET}\nvalue = \"x\"";
        let output = substitute_env_vars(input).unwrap();
        assert!(output.contains("${CARESYNC_TEST_DEFINITELY_UNSET}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/caresync.toml").unwrap_err();
        assert!(matches!(err, CareSyncError::Configuration(_)));
    }
}
