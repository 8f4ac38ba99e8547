//! Suite configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use loanform_common::applicant::DEFAULT_EMAIL_PROVIDER;
use loanform_common::MobileRejection;

use crate::error::{E2eError, E2eResult};
use crate::playwright::Browser;
use crate::spec::{Viewport, DEFAULT_SCENARIO_TIMEOUT_MS, DEFAULT_URL_TIMEOUT_MS};

/// Suite configuration, read from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Origin of the application under test
    pub base_url: String,

    /// Domain for generated email addresses
    pub email_provider: String,

    /// Seed for generated applicant data (random when unset)
    pub seed: Option<u64>,

    /// Extra YAML scenario specs
    pub specs_dir: Option<PathBuf>,

    /// Output directory for results
    pub output_dir: PathBuf,

    /// Browser settings
    pub browser: BrowserConfig,

    /// Timeouts and delays
    pub timing: TimingConfig,

    /// Texts the form renders
    pub messages: FormMessages,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://testapp.fairlo.se".to_string(),
            email_provider: DEFAULT_EMAIL_PROVIDER.to_string(),
            seed: None,
            specs_dir: None,
            output_dir: PathBuf::from("test-results"),
            browser: BrowserConfig::default(),
            timing: TimingConfig::default(),
            messages: FormMessages::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub kind: Browser,
    pub headless: bool,

    /// `node_modules` holding `playwright` and `@playwright/test`
    pub node_modules: PathBuf,

    pub viewport: Viewport,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: Browser::Chromium,
            headless: true,
            node_modules: PathBuf::from("node_modules"),
            viewport: Viewport { width: 1280, height: 720 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Upper bound for one browser session
    pub scenario_timeout_ms: u64,

    /// Wait for the status page after the last submit
    pub status_timeout_ms: u64,

    /// Mouse-down to mouse-up delay on submit buttons
    pub submit_delay_ms: u64,

    /// How long to wait for the remote form to answer before running
    pub probe_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scenario_timeout_ms: DEFAULT_SCENARIO_TIMEOUT_MS,
            status_timeout_ms: DEFAULT_URL_TIMEOUT_MS,
            submit_delay_ms: 1_000,
            probe_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormMessages {
    /// Regular expression the page title must match
    pub title_pattern: String,
    /// Label of the start button on the landing page
    pub apply_label: String,
    /// Heading of the personal details page
    pub form_heading: String,
    pub mobile_missing: String,
    pub mobile_length: String,
    /// Shown on the status page when the loan is approved
    pub approved: String,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            title_pattern: "Fairlo".to_string(),
            apply_label: "Ansök nu".to_string(),
            form_heading: "Lite uppgifter om dig".to_string(),
            mobile_missing: "Vänligen fyll i ditt mobilnummer".to_string(),
            mobile_length: "Vänligen fyll i 10 antal bokstäver".to_string(),
            approved: "Grattis!".to_string(),
        }
    }
}

impl FormMessages {
    /// Inline error text for a rejected mobile number
    pub fn mobile(&self, rejection: MobileRejection) -> &str {
        match rejection {
            MobileRejection::TooShortOrMissing => &self.mobile_missing,
            MobileRejection::TooLong => &self.mobile_length,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults when it does
    /// not exist
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            debug!("Loading suite config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            debug!("No suite config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if regex::Regex::new(&self.messages.title_pattern).is_err() {
            return Err(E2eError::Config(format!(
                "title_pattern is not a valid regular expression: {:?}",
                self.messages.title_pattern
            )));
        }
        if self.timing.status_timeout_ms > self.timing.scenario_timeout_ms {
            return Err(E2eError::Config(
                "status_timeout_ms must not exceed scenario_timeout_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// `base_url` without a trailing slash
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
