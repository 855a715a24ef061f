use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::notification::http::DEFAULT_ENDPOINT;
use crate::notification::NotificationSettings;

pub const CONFIG_FILE: &str = "folio.toml";
pub const RC_FILE: &str = ".folio-rc";

/// Main configuration structure for folio
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Email service settings
    pub notification: NotificationConfig,
    /// Protected resume location
    pub resume: ResumeConfig,
    /// Values shown by the contact card only
    pub display: DisplayConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Send endpoint of the transactional email service
    pub endpoint: String,
    pub service_id: Option<String>,
    /// Public client key (sent as `user_id`)
    pub public_key: Option<String>,
    pub inquiry_template_id: Option<String>,
    pub download_template_id: Option<String>,
    /// Owner address that receives inquiries and download notices
    pub recipient_email: Option<String>,
    /// Upper bound on one submission's wait for the service
    pub timeout_seconds: u64,
    pub requests_per_second: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_id: None,
            public_key: None,
            inquiry_template_id: None,
            download_template_id: None,
            recipient_email: None,
            timeout_seconds: 10,
            // the hosted service allows one request per second per account
            requests_per_second: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResumeConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub contact_email: Option<String>,
    pub linkedin_url: Option<String>,
    pub show_certificate_links: bool,
    /// Credential name → verification URL
    pub certificates: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when RUST_LOG is unset
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{key} is not set (set it in folio.toml, FOLIO_{env}, or {legacy})")]
    Missing {
        key: &'static str,
        env: &'static str,
        legacy: &'static str,
    },
    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{key} must be greater than zero")]
    InvalidRate { key: &'static str },
}

/// Variable names from the site's original build-time environment. They fill
/// any value the folio sources leave unset.
const LEGACY_CERTIFICATES: &[(&str, &str)] = &[
    ("react_js", "VITE_CERT_REACT_JS"),
    ("mongodb", "VITE_CERT_MONGODB"),
    ("mysql", "VITE_CERT_MYSQL"),
    ("html", "VITE_CERT_HTML"),
    ("bootstrap", "VITE_CERT_BOOTSTRAP"),
    ("node_js", "VITE_CERT_NODE_JS"),
    ("css", "VITE_CERT_CSS"),
    ("full_stack", "VITE_CERT_FULL_STACK"),
];

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value.filter(|v| !v.trim().is_empty());
    }
}

fn required(
    value: &Option<String>,
    key: &'static str,
    env: &'static str,
    legacy: &'static str,
) -> Result<String, SettingsError> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or(SettingsError::Missing { key, env, legacy })
}

impl FolioConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (folio.toml, .folio-rc)
    /// 3. Environment variables (FOLIO_ prefix, `__` between sections)
    /// 4. Legacy VITE_* variables for anything still unset
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(CONFIG_FILE, FileFormat::Toml));
        }

        if Path::new(RC_FILE).exists() {
            builder = builder.add_source(File::new(RC_FILE, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut folio_config: FolioConfig = builder.build()?.try_deserialize()?;
        folio_config.apply_legacy_env(|name| std::env::var(name).ok());
        Ok(folio_config)
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let folio_config = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(folio_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    pub fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let notification = &mut self.notification;
        fill(&mut notification.service_id, lookup("VITE_EMAILJS_SERVICE_ID"));
        fill(&mut notification.public_key, lookup("VITE_EMAILJS_PUBLIC_KEY"));
        fill(&mut notification.inquiry_template_id, lookup("VITE_EMAILJS_TEMPLATE_ID"));
        fill(
            &mut notification.download_template_id,
            lookup("VITE_RESUME_NOTIFICATION_TEMPLATE_ID"),
        );
        fill(&mut notification.recipient_email, lookup("VITE_RECIPIENT_EMAIL"));

        fill(&mut self.resume.url, lookup("VITE_RESUME_URL"));

        let display = &mut self.display;
        fill(&mut display.contact_email, lookup("VITE_EMAIL"));
        fill(&mut display.linkedin_url, lookup("VITE_LINKEDIN_URL"));
        if !display.show_certificate_links {
            display.show_certificate_links =
                lookup("VITE_SHOW_CERTIFICATE_LINKS").as_deref() == Some("true");
        }
        for (name, var) in LEGACY_CERTIFICATES {
            if display.certificates.contains_key(*name) {
                continue;
            }
            if let Some(url) = lookup(var).filter(|v| !v.trim().is_empty()) {
                display.certificates.insert(name.to_string(), url);
            }
        }
    }

    pub fn notification_settings(&self) -> Result<NotificationSettings, SettingsError> {
        let n = &self.notification;
        Ok(NotificationSettings {
            service_id: required(
                &n.service_id,
                "notification.service_id",
                "NOTIFICATION__SERVICE_ID",
                "VITE_EMAILJS_SERVICE_ID",
            )?,
            public_key: required(
                &n.public_key,
                "notification.public_key",
                "NOTIFICATION__PUBLIC_KEY",
                "VITE_EMAILJS_PUBLIC_KEY",
            )?,
            inquiry_template_id: required(
                &n.inquiry_template_id,
                "notification.inquiry_template_id",
                "NOTIFICATION__INQUIRY_TEMPLATE_ID",
                "VITE_EMAILJS_TEMPLATE_ID",
            )?,
            download_template_id: required(
                &n.download_template_id,
                "notification.download_template_id",
                "NOTIFICATION__DOWNLOAD_TEMPLATE_ID",
                "VITE_RESUME_NOTIFICATION_TEMPLATE_ID",
            )?,
            recipient_email: required(
                &n.recipient_email,
                "notification.recipient_email",
                "NOTIFICATION__RECIPIENT_EMAIL",
                "VITE_RECIPIENT_EMAIL",
            )?,
        })
    }

    pub fn resume_url(&self) -> Result<Url, SettingsError> {
        let value = required(&self.resume.url, "resume.url", "RESUME__URL", "VITE_RESUME_URL")?;
        Url::parse(&value).map_err(|source| SettingsError::InvalidUrl {
            key: "resume.url",
            value,
            source,
        })
    }

    /// A zero timeout would fail every submission, so it is refused here.
    pub fn submit_timeout(&self) -> Result<Duration, SettingsError> {
        match self.notification.timeout_seconds {
            0 => Err(SettingsError::InvalidRate {
                key: "notification.timeout_seconds",
            }),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    pub fn rate_limit(&self) -> Result<NonZeroU32, SettingsError> {
        NonZeroU32::new(self.notification.requests_per_second).ok_or(SettingsError::InvalidRate {
            key: "notification.requests_per_second",
        })
    }

    /// Copy safe to print: the public key is masked.
    pub fn redacted(&self) -> FolioConfig {
        let mut copy = self.clone();
        if let Some(key) = copy.notification.public_key.as_mut() {
            let visible: String = key.chars().take(3).collect();
            *key = format!("{visible}***");
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FULL: &str = r#"
        [notification]
        service_id = "service_abc"
        public_key = "pk_live_123"
        inquiry_template_id = "template_inquiry"
        download_template_id = "template_resume"
        recipient_email = "owner@example.com"
        timeout_seconds = 4

        [resume]
        url = "https://files.example.com/resume.pdf"
    "#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FolioConfig::default();
        assert_eq!(config.notification.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.submit_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.rate_limit().unwrap().get(), 1);
        assert_eq!(config.notification.requests_per_second, 1);
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.display.show_certificate_links);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FolioConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.notification.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.submit_timeout().unwrap(), Duration::from_secs(4));

        let settings = config.notification_settings().unwrap();
        assert_eq!(settings.service_id, "service_abc");
        assert_eq!(settings.template_id(crate::notification::TemplateKind::DownloadNotice), "template_resume");
        assert_eq!(config.resume_url().unwrap().as_str(), "https://files.example.com/resume.pdf");
    }

    #[test]
    fn test_missing_setting_names_all_sources() {
        let config = FolioConfig::default();
        let err = config.notification_settings().unwrap_err();

        let message = err.to_string();
        assert!(message.contains("notification.service_id"));
        assert!(message.contains("FOLIO_NOTIFICATION__SERVICE_ID"));
        assert!(message.contains("VITE_EMAILJS_SERVICE_ID"));
    }

    #[test]
    fn test_invalid_resume_url() {
        let config = FolioConfig::from_toml_str("[resume]\nurl = \"not a url\"").unwrap();
        assert!(matches!(config.resume_url(), Err(SettingsError::InvalidUrl { .. })));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = FolioConfig::from_toml_str("[notification]\ntimeout_seconds = 0").unwrap();
        let err = config.submit_timeout().unwrap_err();
        assert_eq!(err.to_string(), "notification.timeout_seconds must be greater than zero");
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = FolioConfig::from_toml_str("[notification]\nrequests_per_second = 0").unwrap();
        assert!(matches!(
            config.rate_limit(),
            Err(SettingsError::InvalidRate {
                key: "notification.requests_per_second"
            })
        ));
    }

    #[test]
    fn test_legacy_env_fills_unset_values_only() {
        let mut config = FolioConfig::from_toml_str(FULL).unwrap();
        config.apply_legacy_env(env(&[
            ("VITE_EMAILJS_SERVICE_ID", "legacy_service"),
            ("VITE_EMAIL", "hello@example.com"),
            ("VITE_SHOW_CERTIFICATE_LINKS", "true"),
            ("VITE_CERT_MONGODB", "https://learn.mongodb.com/c/abc"),
            ("VITE_CERT_CSS", ""),
        ]));

        assert_eq!(config.notification.service_id.as_deref(), Some("service_abc"));
        assert_eq!(config.display.contact_email.as_deref(), Some("hello@example.com"));
        assert!(config.display.show_certificate_links);
        assert_eq!(
            config.display.certificates.get("mongodb").map(String::as_str),
            Some("https://learn.mongodb.com/c/abc")
        );
        assert!(!config.display.certificates.contains_key("css"));
    }

    #[test]
    fn test_legacy_env_alone_is_enough() {
        let mut config = FolioConfig::default();
        config.apply_legacy_env(env(&[
            ("VITE_EMAILJS_SERVICE_ID", "s"),
            ("VITE_EMAILJS_PUBLIC_KEY", "k"),
            ("VITE_EMAILJS_TEMPLATE_ID", "t1"),
            ("VITE_RESUME_NOTIFICATION_TEMPLATE_ID", "t2"),
            ("VITE_RECIPIENT_EMAIL", "me@example.com"),
            ("VITE_RESUME_URL", "https://example.com/cv.pdf"),
        ]));

        let settings = config.notification_settings().unwrap();
        assert_eq!(settings.inquiry_template_id, "t1");
        assert_eq!(settings.download_template_id, "t2");
        assert!(config.resume_url().is_ok());
    }

    #[test]
    fn test_certificate_flag_requires_literal_true() {
        let mut config = FolioConfig::default();
        config.apply_legacy_env(env(&[("VITE_SHOW_CERTIFICATE_LINKS", "yes")]));
        assert!(!config.display.show_certificate_links);
    }

    #[test]
    fn test_redacted_masks_public_key() {
        let config = FolioConfig::from_toml_str(FULL).unwrap();
        let redacted = config.redacted();
        assert_eq!(redacted.notification.public_key.as_deref(), Some("pk_***"));
        assert_eq!(config.notification.public_key.as_deref(), Some("pk_live_123"));
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = FolioConfig::from_toml_str(FULL).unwrap();

        config.save_to_file(&path).unwrap();
        let reloaded = FolioConfig::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, config);
    }
}
