//! Playwright browser automation
//!
//! A scenario is rendered into one Node script so the page keeps its state
//! across steps. Every step reports a JSON line on stdout, which is how the
//! driver learns which step failed and how long each one took.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::spec::{ScenarioSpec, TestStep};

/// Playwright browser handle
pub struct PlaywrightHandle {
    /// Origin that relative URLs resolve against
    base_url: String,

    browser: Browser,

    headless: bool,

    /// Exported as `NODE_PATH` so the script finds the Playwright packages
    node_modules: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(format!("unknown browser: {other}")),
        }
    }
}

/// Result of executing a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// How a browser session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    /// A step reported a failure
    StepFailed,
    /// The script exited non-zero without blaming a step
    Crashed { stderr: String },
    /// The session outlived the scenario timeout and was killed
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub steps: Vec<StepResult>,
    pub outcome: RunOutcome,
}

/// Line printed by the rendered script after each step
#[derive(Debug, Deserialize)]
struct StepEvent {
    step: usize,
    ok: bool,
    ms: u64,
    #[serde(default)]
    error: Option<String>,
}

impl PlaywrightHandle {
    /// Create a new Playwright handle, verifying the installation
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;
        Ok(Self::unchecked(config))
    }

    /// Handle that can render scripts without Playwright being installed
    pub fn unchecked(config: PlaywrightConfig) -> Self {
        Self {
            base_url: config.base_url,
            browser: config.browser,
            headless: config.headless,
            node_modules: config.node_modules,
        }
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Build the Node script for a whole scenario
    pub fn render_script(&self, spec: &ScenarioSpec) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ {browser} }} = require('playwright');
const {{ expect }} = require('@playwright/test');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = {base_url};
  const report = (event) => console.log(JSON.stringify(event));
  const step = async (index, body) => {{
    const started = Date.now();
    try {{
      await body();
      report({{ step: index, ok: true, ms: Date.now() - started }});
    }} catch (error) {{
      const message = String((error && error.message) || error);
      report({{ step: index, ok: false, ms: Date.now() - started, error: message }});
      throw error;
    }}
  }};

  let failed = false;
  try {{
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = spec.viewport.width,
            height = spec.viewport.height,
            base_url = js_string(&self.base_url),
        ));

        for (index, step) in spec.all_steps().iter().enumerate() {
            script.push_str(&format!("    // Step {}: {}\n", index + 1, step.name()));
            script.push_str(&format!(
                "    await step({}, async () => {{\n      {}\n    }});\n",
                index,
                step_to_js(step)
            ));
        }

        script.push_str(
            r#"  } catch (error) {
    failed = true;
  } finally {
    await browser.close();
  }
  process.exit(failed ? 1 : 0);
})().catch((error) => {
  console.error(error);
  process.exit(2);
});
"#,
        );

        script
    }

    /// Run a scenario in a fresh browser, bounded by its timeout
    pub async fn run(&self, spec: &ScenarioSpec) -> E2eResult<ScenarioRun> {
        let steps = spec.all_steps();
        let script = self.render_script(spec);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        tokio::fs::write(&script_path, script).await?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .env("NODE_PATH", absolute(&self.node_modules)?)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| E2eError::Playwright(format!("failed to start node: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Playwright("stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| E2eError::Playwright("stderr not captured".to_string()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buffer = String::new();
            let _ = BufReader::new(stderr).read_to_string(&mut buffer).await;
            buffer
        });

        let mut events = Vec::new();
        let mut lines = BufReader::new(stdout).lines();
        let session = async {
            while let Some(line) = lines.next_line().await? {
                match serde_json::from_str::<StepEvent>(&line) {
                    Ok(event) => events.push(event),
                    Err(_) => debug!(scenario = %spec.name, "node: {}", line),
                }
            }
            child.wait().await
        };

        let waited = timeout(Duration::from_millis(spec.timeout_ms), session).await;
        let status = match waited {
            Ok(status) => Some(status?),
            Err(_) => {
                warn!(
                    "Scenario '{}' exceeded {} ms, killing browser",
                    spec.name, spec.timeout_ms
                );
                child.kill().await?;
                None
            }
        };

        let stderr = stderr_task.await.unwrap_or_default();
        let mut results = step_results(&events, &steps);

        let outcome = match status {
            None => {
                let index = results.len();
                if let Some(step) = steps.get(index) {
                    results.push(StepResult {
                        index,
                        success: false,
                        step_name: step.name(),
                        duration_ms: 0,
                        error: Some(format!("timed out after {} ms", spec.timeout_ms)),
                    });
                }
                RunOutcome::TimedOut
            }
            Some(_) if results.iter().any(|r| !r.success) => RunOutcome::StepFailed,
            Some(status) if status.success() => RunOutcome::Passed,
            Some(_) => RunOutcome::Crashed { stderr },
        };

        Ok(ScenarioRun { steps: results, outcome })
    }
}

/// Match reported events with the steps they belong to
fn step_results(events: &[StepEvent], steps: &[TestStep]) -> Vec<StepResult> {
    events
        .iter()
        .map(|event| StepResult {
            index: event.step,
            success: event.ok,
            step_name: steps
                .get(event.step)
                .map(TestStep::name)
                .unwrap_or_else(|| format!("step {}", event.step)),
            duration_ms: event.ms,
            error: event.error.clone(),
        })
        .collect()
}

fn absolute(path: &Path) -> E2eResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Quote a value as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Body of one step, run inside `step(index, async () => { ... })`
fn step_to_js(step: &TestStep) -> String {
    match step {
        TestStep::Navigate { url } => {
            format!("await page.goto(new URL({}, baseUrl).toString());", js_string(url))
        }
        TestStep::WaitForLoad { state } => {
            format!("await page.waitForLoadState({});", js_string(state.as_str()))
        }
        TestStep::Click { selector, nth, delay_ms } => {
            let nth = nth.map(|n| format!(".nth({})", n)).unwrap_or_default();
            format!(
                "await page.locator({}){}.click({{ delay: {} }});",
                js_string(selector),
                nth,
                delay_ms.unwrap_or(0)
            )
        }
        TestStep::ClickLabel { label } => {
            format!("await page.getByLabel({}).click();", js_string(label))
        }
        TestStep::Fill { selector, value } => {
            format!(
                "await page.locator({}).fill({});",
                js_string(selector),
                js_string(value)
            )
        }
        TestStep::WaitForUrl { pattern, timeout_ms } => {
            format!(
                "await page.waitForURL({}, {{ timeout: {} }});",
                js_string(pattern),
                timeout_ms
            )
        }
        TestStep::AssertTitle { pattern } => {
            format!(
                "await expect(page).toHaveTitle(new RegExp({}));",
                js_string(pattern)
            )
        }
        TestStep::AssertVisible { selector, visible } => {
            format!(
                "await expect(page.locator({})){}.toBeVisible();",
                js_string(selector),
                if *visible { "" } else { ".not" }
            )
        }
        TestStep::AssertText { text, visible } => {
            format!(
                "await expect(page.getByText({})){}.toBeVisible();",
                js_string(text),
                if *visible { "" } else { ".not" }
            )
        }
        TestStep::AssertContainsText { selector, text } => {
            format!(
                "await expect(page.locator({})).toContainText({});",
                js_string(selector),
                js_string(text)
            )
        }
        TestStep::AssertChecked { selector } => {
            format!("await expect(page.locator({})).toBeChecked();", js_string(selector))
        }
        TestStep::Log { message } => {
            format!("console.error({});", js_string(&format!("[scenario] {}", message)))
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub node_modules: PathBuf,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self::from(&SuiteConfig::default())
    }
}

impl From<&SuiteConfig> for PlaywrightConfig {
    fn from(config: &SuiteConfig) -> Self {
        Self {
            base_url: config.origin().to_string(),
            browser: config.browser.kind,
            headless: config.browser.headless,
            node_modules: config.browser.node_modules.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;

    fn handle() -> PlaywrightHandle {
        PlaywrightHandle::unchecked(PlaywrightConfig::default())
    }

    #[test]
    fn test_render_includes_fixture_and_steps() {
        let spec = ScenarioSpec::new("mobile", Fixture::FormPage).step(TestStep::Fill {
            selector: "#mobile".to_string(),
            value: "0701020304".to_string(),
        });
        let script = handle().render_script(&spec);

        assert!(script.contains("const { chromium } = require('playwright');"));
        assert!(script.contains(r#"const baseUrl = "https://testapp.fairlo.se";"#));
        assert!(script.contains(
            r#"await page.goto(new URL("/application/personal-details", baseUrl).toString());"#
        ));
        assert!(script.contains(r#"await page.waitForLoadState("domcontentloaded");"#));
        assert!(script.contains(r##"await page.locator("#mobile").fill("0701020304");"##));
        assert!(script.contains("await step(2, async () => {"));
        assert!(!script.contains("await step(3,"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let step = TestStep::Fill {
            selector: "#email".to_string(),
            value: "o'brien\"@tester.com".to_string(),
        };
        assert_eq!(
            step_to_js(&step),
            r##"await page.locator("#email").fill("o'brien\"@tester.com");"##
        );
    }

    #[test]
    fn test_assertion_rendering() {
        let hidden = TestStep::AssertVisible {
            selector: "#email-error-message".to_string(),
            visible: false,
        };
        assert_eq!(
            step_to_js(&hidden),
            r##"await expect(page.locator("#email-error-message")).not.toBeVisible();"##
        );

        let click = TestStep::Click {
            selector: "ul > li".to_string(),
            nth: Some(1),
            delay_ms: None,
        };
        assert_eq!(
            step_to_js(&click),
            r#"await page.locator("ul > li").nth(1).click({ delay: 0 });"#
        );

        let wait = TestStep::WaitForUrl {
            pattern: "**/status".to_string(),
            timeout_ms: 300_000,
        };
        assert_eq!(
            step_to_js(&wait),
            r#"await page.waitForURL("**/status", { timeout: 300000 });"#
        );

        let title = TestStep::AssertTitle {
            pattern: "Fairlo".to_string(),
        };
        assert_eq!(
            step_to_js(&title),
            r#"await expect(page).toHaveTitle(new RegExp("Fairlo"));"#
        );
    }

    #[test]
    fn test_browser_and_headless_follow_config() {
        let config = PlaywrightConfig {
            browser: Browser::Webkit,
            headless: false,
            ..Default::default()
        };
        let script = PlaywrightHandle::unchecked(config)
            .render_script(&ScenarioSpec::new("x", Fixture::ApplicationPage));
        assert!(script.contains("const { webkit } = require('playwright');"));
        assert!(script.contains("await webkit.launch({ headless: false });"));
    }

    #[test]
    fn test_step_results_from_events() {
        let steps = Fixture::FormPage.steps();
        let events = vec![
            StepEvent { step: 0, ok: true, ms: 120, error: None },
            StepEvent {
                step: 1,
                ok: false,
                ms: 30_000,
                error: Some("Timeout 30000ms exceeded".to_string()),
            },
        ];
        let results = step_results(&events, &steps);
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert_eq!(results[0].step_name, "navigate:/application/personal-details");
        assert_eq!(results[1].error.as_deref(), Some("Timeout 30000ms exceeded"));
    }

    #[test]
    fn test_event_line_parsing() {
        let event: StepEvent = serde_json::from_str(r#"{"step":3,"ok":true,"ms":12}"#).unwrap();
        assert_eq!(event.step, 3);
        assert!(event.error.is_none());
        assert!(serde_json::from_str::<StepEvent>("[scenario] hello").is_err());
    }

    #[test]
    fn test_browser_from_str() {
        assert_eq!("firefox".parse::<Browser>(), Ok(Browser::Firefox));
        assert!("opera".parse::<Browser>().is_err());
    }
}
