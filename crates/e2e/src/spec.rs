//! Declarative YAML scenario specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};
use crate::fixtures::Fixture;

/// A complete scenario, either built in code or parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Page the scenario starts on
    #[serde(default)]
    pub fixture: Option<Fixture>,

    /// Viewport size for the browser
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Upper bound for the whole browser session
    #[serde(default = "default_scenario_timeout")]
    pub timeout_ms: u64,

    /// Steps to execute in order, after the fixture steps
    pub steps: Vec<TestStep>,
}

fn default_viewport() -> Viewport {
    Viewport { width: 1280, height: 720 }
}

/// Long enough for the five minute wait on the status page
pub const DEFAULT_SCENARIO_TIMEOUT_MS: u64 = 360_000;

fn default_scenario_timeout() -> u64 {
    DEFAULT_SCENARIO_TIMEOUT_MS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A single step in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (relative to base)
    Navigate {
        url: String,
    },

    /// Wait for the page to reach a load state
    WaitForLoad {
        #[serde(default)]
        state: LoadState,
    },

    /// Click an element, optionally the nth match
    Click {
        selector: String,
        #[serde(default)]
        nth: Option<usize>,
        #[serde(default)]
        delay_ms: Option<u64>,
    },

    /// Click the element labelled `label`
    ClickLabel {
        label: String,
    },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
    },

    /// Wait until the URL matches a glob pattern
    WaitForUrl {
        pattern: String,
        #[serde(default = "default_url_timeout")]
        timeout_ms: u64,
    },

    /// Page title matches a regular expression
    AssertTitle {
        pattern: String,
    },

    /// Element visibility
    AssertVisible {
        selector: String,
        #[serde(default = "default_true")]
        visible: bool,
    },

    /// Visibility of an element found by its text
    AssertText {
        text: String,
        #[serde(default = "default_true")]
        visible: bool,
    },

    /// Element text contains a substring
    AssertContainsText {
        selector: String,
        text: String,
    },

    /// Checkbox or radio is checked
    AssertChecked {
        selector: String,
    },

    /// Log a message (for debugging)
    Log {
        message: String,
    },
}

/// The status page can take minutes to resolve
pub const DEFAULT_URL_TIMEOUT_MS: u64 = 300_000;

fn default_url_timeout() -> u64 {
    DEFAULT_URL_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Load,
    #[default]
    Domcontentloaded,
    Networkidle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::Domcontentloaded => "domcontentloaded",
            LoadState::Networkidle => "networkidle",
        }
    }
}

impl TestStep {
    /// Short label used in logs and reports
    pub fn name(&self) -> String {
        match self {
            TestStep::Navigate { url } => format!("navigate:{}", url),
            TestStep::WaitForLoad { state } => format!("wait_for_load:{}", state.as_str()),
            TestStep::Click { selector, nth: Some(n), .. } => format!("click:{}[{}]", selector, n),
            TestStep::Click { selector, .. } => format!("click:{}", selector),
            TestStep::ClickLabel { label } => format!("click_label:{}", label),
            TestStep::Fill { selector, .. } => format!("fill:{}", selector),
            TestStep::WaitForUrl { pattern, .. } => format!("wait_for_url:{}", pattern),
            TestStep::AssertTitle { pattern } => format!("assert_title:{}", pattern),
            TestStep::AssertVisible { selector, visible } => {
                format!("assert_{}:{}", if *visible { "visible" } else { "hidden" }, selector)
            }
            TestStep::AssertText { text, visible } => {
                format!("assert_text_{}:{}", if *visible { "visible" } else { "hidden" }, text)
            }
            TestStep::AssertContainsText { selector, .. } => format!("assert_contains_text:{}", selector),
            TestStep::AssertChecked { selector } => format!("assert_checked:{}", selector),
            TestStep::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl ScenarioSpec {
    pub fn new(name: impl Into<String>, fixture: Fixture) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            fixture: Some(fixture),
            viewport: default_viewport(),
            timeout_ms: DEFAULT_SCENARIO_TIMEOUT_MS,
            steps: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn step(mut self, step: TestStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Fixture steps followed by the scenario's own steps
    pub fn all_steps(&self) -> Vec<TestStep> {
        let mut steps = self.fixture.map(|f| f.steps()).unwrap_or_default();
        steps.extend(self.steps.iter().cloned());
        steps
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Parse a scenario spec from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        if spec.name.trim().is_empty() {
            return Err(E2eError::SpecParse("scenario name is empty".to_string()));
        }
        Ok(spec)
    }

    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a scenario spec from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all scenario specs from a directory, sorted by path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            specs.push(Self::from_file(entry.path())?);
        }

        Ok(specs)
    }

    /// Filter specs by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.has_tag(tag)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_spec() {
        let yaml = r#"
name: mobile-too-long
description: Mobile number with eleven digits
fixture: form_page
tags:
  - mobile
steps:
  - action: fill
    selector: '#mobile'
    value: '07010203045'
  - action: assert_visible
    selector: '#mobile-error-message'
  - action: assert_contains_text
    selector: '#mobile-error-message'
    text: Vänligen fyll i 10 antal bokstäver
"#;
        let spec = ScenarioSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.name, "mobile-too-long");
        assert_eq!(spec.fixture, Some(Fixture::FormPage));
        assert_eq!(spec.steps.len(), 3);
        assert_eq!(spec.timeout_ms, DEFAULT_SCENARIO_TIMEOUT_MS);
        assert_eq!(
            spec.steps[1],
            TestStep::AssertVisible {
                selector: "#mobile-error-message".to_string(),
                visible: true
            }
        );
        // fixture navigation and load wait come first
        assert_eq!(spec.all_steps().len(), 5);
    }

    #[test]
    fn test_parse_wait_for_url_defaults() {
        let yaml = r#"
name: status
steps:
  - action: wait_for_url
    pattern: '**/status'
  - action: assert_text
    text: Grattis!
    visible: false
"#;
        let spec = ScenarioSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.fixture, None);
        assert_eq!(
            spec.steps[0],
            TestStep::WaitForUrl {
                pattern: "**/status".to_string(),
                timeout_ms: DEFAULT_URL_TIMEOUT_MS
            }
        );
        assert_eq!(spec.all_steps().len(), 2);
    }

    #[test]
    fn test_rejects_unnamed_spec() {
        let yaml = "name: ' '\nsteps: []\n";
        assert!(matches!(
            ScenarioSpec::from_yaml(yaml),
            Err(E2eError::SpecParse(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let spec = ScenarioSpec::new("round-trip", Fixture::ApplicationPage)
            .tag("sanity")
            .step(TestStep::AssertTitle { pattern: "Fairlo".to_string() });
        let parsed = ScenarioSpec::from_yaml(&spec.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed.name, spec.name);
        assert_eq!(parsed.steps, spec.steps);
        assert!(parsed.has_tag("sanity"));
    }

    #[test]
    fn test_load_all_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.yaml"), "name: second\nsteps: []\n").unwrap();
        std::fs::write(dir.path().join("a.yml"), "name: first\nsteps: []\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let specs = ScenarioSpec::load_all(dir.path()).unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_step_names() {
        let step = TestStep::Click {
            selector: "ul > li".to_string(),
            nth: Some(1),
            delay_ms: None,
        };
        assert_eq!(step.name(), "click:ul > li[1]");
        let step = TestStep::AssertVisible {
            selector: "#email-error-message".to_string(),
            visible: false,
        };
        assert_eq!(step.name(), "assert_hidden:#email-error-message");
    }
}
