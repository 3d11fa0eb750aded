//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Tourmark configuration file.

use crate::adapters::registry::{ConfiguredCredential, CredentialSource};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also require the registry service key to be resolvable now
    #[arg(long)]
    pub check_credential: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        let credential = ConfiguredCredential::from_config(&config.registry);

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Registry: {}", config.registry.base_url);
        println!(
            "  Client: {} / {}",
            config.registry.mobile_os, config.registry.mobile_app
        );
        println!("  Service Key: {}", credential.describe());
        println!("  Cache TTL: {}s", config.registry.cache_ttl_seconds);
        println!("  Max Attempts: {}", config.registry.retry.max_retries);
        println!("  Merge Policy: {}", config.bookmarks.merge_policy);
        println!("  Local Store: {}", config.local_store.path);
        match config.postgresql {
            Some(ref pg_config) => {
                use secrecy::ExposeSecret;
                let conn_str: &str = pg_config.connection_string.expose_secret().as_ref();
                println!(
                    "  PostgreSQL: {}",
                    conn_str.rsplit_once('@').map(|(_, host)| host).unwrap_or("***")
                );
                println!("  Max Connections: {}", pg_config.max_connections);
            }
            None => println!("  PostgreSQL: not configured (anonymous bookmarks only)"),
        }
        println!();

        if self.check_credential {
            if let Err(e) = credential.resolve() {
                println!("❌ {e}");
                return Ok(2);
            }
            println!("✅ Service key is available");
        }

        Ok(0)
    }
}
