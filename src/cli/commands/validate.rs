//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the CareSync configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so a successful load means
        // the file is both well-formed and semantically valid
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  FHIR Server: {}", config.fhir.base_url);
                println!("  Token Endpoint: {}", config.fhir.token_url);
                println!("  Client ID: {}", config.fhir.client_id);
                println!("  Page Size: {}", config.fhir.page_size);
                println!("  Max Records: {}", config.fhir.max_records);
                println!("  ID Batch Size: {}", config.fhir.id_batch_size);
                println!("  Store Path: {}", config.store.path);
                println!("  File Logging: {}", config.logging.file_enabled);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/caresync.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
