//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "glip-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing glip-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your app and account settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - GLIP_EXPORT_CLIENT_SECRET");
                println!("     - GLIP_EXPORT_PASSWORD");
                println!("  3. Validate configuration: glip-export validate-config");
                println!("  4. Run export: glip-export export");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Starter configuration
    fn generate_config() -> &'static str {
        r#"# glip-export configuration
# Compliance export of Glip (team messaging) data

environment = "production"  # development | staging | production

[application]
log_level = "info"          # trace | debug | info | warn | error
dry_run = false

[platform]
server_url = "https://platform.ringcentral.com"
client_id = "your-client-id"
client_secret = "${GLIP_EXPORT_CLIENT_SECRET}"
username = "+16505550100"
extension = ""              # optional
password = "${GLIP_EXPORT_PASSWORD}"
timeout_seconds = 60
tls_verify = true

[export]
time_from = "2019-07-01T00:00:00.000Z"
time_to = "2019-07-29T23:59:59.999Z"
# contacts = ["jane@example.com"]
# chat_ids = ["1234567"]
output_dir = "."
file_prefix = "rc-export-reports"
poll_interval_seconds = 5
max_poll_attempts = 0       # 0 = poll until the task finishes
backoff_multiplier = 1.0    # 1.0 = fixed interval
max_poll_interval_seconds = 300

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"    # daily | hourly | never
"#
    }
}
