use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::{FolioConfig, CONFIG_FILE};

pub struct InitCommand {
    force: bool,
    dir: PathBuf,
}

impl InitCommand {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            dir: PathBuf::from("."),
        }
    }

    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = dir.as_ref().to_path_buf();
        self
    }

    /// Starter values the owner replaces with their own identifiers.
    fn starter_config() -> FolioConfig {
        let mut config = FolioConfig::default();
        let n = &mut config.notification;
        n.service_id = Some("service_xxxxxxx".to_string());
        n.public_key = Some("your-public-key".to_string());
        n.inquiry_template_id = Some("template_inquiry".to_string());
        n.download_template_id = Some("template_resume".to_string());
        n.recipient_email = Some("you@example.com".to_string());
        config.resume.url = Some("https://example.com/resume.pdf".to_string());
        config.display.contact_email = Some("you@example.com".to_string());
        config
    }

    pub fn execute(&self) -> Result<PathBuf> {
        let path = self.dir.join(CONFIG_FILE);
        if path.exists() && !self.force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }

        Self::starter_config().save_to_file(&path)?;
        println!("✅ Wrote {}", path.display());
        println!("   → Replace the placeholder identifiers with your email service values");
        Ok(path)
    }
}
