use anyhow::Result;

use crate::config::FolioConfig;

pub struct ConfigCommand;

impl ConfigCommand {
    pub fn execute(&self, config: &FolioConfig) -> Result<()> {
        print!("{}", toml::to_string_pretty(&config.redacted())?);

        let mut problems = Vec::new();
        if let Err(e) = config.notification_settings() {
            problems.push(e.to_string());
        }
        if let Err(e) = config.resume_url() {
            problems.push(e.to_string());
        }
        if let Err(e) = config.submit_timeout() {
            problems.push(e.to_string());
        }
        if let Err(e) = config.rate_limit() {
            problems.push(e.to_string());
        }

        println!();
        if problems.is_empty() {
            println!("✅ Configuration complete");
        } else {
            println!("⚠️  Configuration incomplete:");
            for problem in problems {
                println!("   → {problem}");
            }
        }
        Ok(())
    }
}
