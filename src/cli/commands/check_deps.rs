//! Check-deps command implementation
//!
//! Prints the capability descriptor of this build.

use crate::core::capabilities::Capabilities;
use clap::Args;

/// Arguments for the check-deps command
#[derive(Args, Debug)]
pub struct CheckDepsArgs {
    /// Print the descriptor as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckDepsArgs {
    /// Execute the check-deps command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let capabilities = Capabilities::detect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
            return Ok(0);
        }

        println!("🔧 Optional backends:");
        for (name, available, description) in capabilities.describe() {
            let mark = if available { "✅" } else { "➖" };
            println!("  {mark} {name:<26} {description}");
        }
        if !capabilities.hardened_kdf {
            println!();
            println!("⚠️  Pseudonyms use truncated HMAC-SHA256, which is weaker than PBKDF2.");
            println!("   Rebuild with the `hardened-kdf` feature for the hardened backend.");
        }
        Ok(0)
    }
}
