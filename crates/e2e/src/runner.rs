//! Main test runner that orchestrates the target probe and Playwright sessions

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightHandle, RunOutcome, ScenarioRun, StepResult};
use crate::scenarios;
use crate::spec::ScenarioSpec;
use crate::target::RemoteTarget;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    #[serde(default)]
    pub skipped: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl SuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub suite: SuiteConfig,

    /// Render scripts into the output directory instead of running them
    pub dry_run: bool,
}

impl From<SuiteConfig> for RunnerConfig {
    fn from(suite: SuiteConfig) -> Self {
        Self {
            suite,
            dry_run: false,
        }
    }
}

/// Main E2E test runner
pub struct TestRunner {
    suite: SuiteConfig,
    playwright_config: PlaywrightConfig,
    dry_run: bool,
    output_dir: PathBuf,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            playwright_config: PlaywrightConfig::from(&config.suite),
            output_dir: config.suite.output_dir.clone(),
            dry_run: config.dry_run,
            suite: config.suite,
        }
    }

    pub fn suite(&self) -> &SuiteConfig {
        &self.suite
    }

    /// Wait for the application under test to answer
    pub async fn probe_target(&self) -> E2eResult<()> {
        RemoteTarget::new(&self.suite.base_url)
            .probe(Duration::from_millis(self.suite.timing.probe_timeout_ms))
            .await
    }

    /// Built-in scenarios followed by the YAML specs in `specs_dir`
    pub fn load_specs(&self) -> E2eResult<Vec<ScenarioSpec>> {
        let mut specs = scenarios::builtin(&self.suite)?;

        if let Some(dir) = &self.suite.specs_dir {
            let extra = ScenarioSpec::load_all(dir)?;
            debug!("Loaded {} scenario(s) from {}", extra.len(), dir.display());
            specs.extend(extra);
        }

        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(E2eError::SpecParse(format!(
                    "duplicate scenario name: {}",
                    spec.name
                )));
            }
        }

        Ok(specs)
    }

    /// Run every scenario
    pub async fn run_all(&self) -> E2eResult<SuiteResult> {
        let specs = self.load_specs()?;
        self.run_specs(&specs).await
    }

    /// Run scenarios matching a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<SuiteResult> {
        let specs: Vec<ScenarioSpec> = self
            .load_specs()?
            .into_iter()
            .filter(|s| s.has_tag(tag))
            .collect();
        self.run_specs(&specs).await
    }

    /// Run a specific scenario by name
    pub async fn run_test(&self, name: &str) -> E2eResult<TestResult> {
        let spec = self
            .load_specs()?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Scenario not found: {}", name)))?;

        let mut suite = self.run_specs(std::slice::from_ref(&spec)).await?;
        suite
            .results
            .pop()
            .ok_or_else(|| E2eError::SpecParse(format!("Scenario not run: {}", name)))
    }

    /// Run a list of scenarios, one browser session each
    pub async fn run_specs(&self, specs: &[ScenarioSpec]) -> E2eResult<SuiteResult> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(specs.len());
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        let playwright = if self.dry_run {
            PlaywrightHandle::unchecked(self.playwright_config.clone())
        } else {
            self.probe_target().await?;
            PlaywrightHandle::new(self.playwright_config.clone())?
        };

        info!("Running {} scenario(s)...", specs.len());

        for spec in specs {
            let result = if self.dry_run {
                self.render_spec(&playwright, spec)?
            } else {
                self.run_spec(&playwright, spec).await
            };

            if result.skipped {
                skipped += 1;
                debug!("- {} (rendered)", result.name);
            } else if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms
        );

        Ok(SuiteResult {
            total: specs.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            results,
        })
    }

    /// Run a single scenario; a driver error fails the scenario, not the suite
    pub async fn run_spec(&self, playwright: &PlaywrightHandle, spec: &ScenarioSpec) -> TestResult {
        let start = Instant::now();
        debug!("Running scenario: {}", spec.name);

        let (steps, error) = match playwright.run(spec).await {
            Ok(run) => {
                let error = outcome_error(spec, &run).map(|e| e.to_string());
                (run.steps, error)
            }
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        TestResult {
            name: spec.name.clone(),
            success: error.is_none(),
            skipped: false,
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error,
        }
    }

    /// Write the scenario's script under `<output>/scripts` without running it
    fn render_spec(&self, playwright: &PlaywrightHandle, spec: &ScenarioSpec) -> E2eResult<TestResult> {
        let dir = self.output_dir.join("scripts");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.js", slug(&spec.name)));
        std::fs::write(&path, playwright.render_script(spec))?;

        Ok(TestResult {
            name: spec.name.clone(),
            success: true,
            skipped: true,
            duration_ms: 0,
            steps: Vec::new(),
            error: None,
        })
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a finished session counts as a failure, if it does
fn outcome_error(spec: &ScenarioSpec, run: &ScenarioRun) -> Option<E2eError> {
    match &run.outcome {
        RunOutcome::Passed => None,
        RunOutcome::StepFailed => {
            let failed = run.steps.iter().find(|s| !s.success);
            Some(E2eError::StepFailed {
                step: failed.map(|s| s.step_name.clone()).unwrap_or_default(),
                reason: failed
                    .and_then(|s| s.error.clone())
                    .unwrap_or_else(|| "no error reported".to_string()),
            })
        }
        RunOutcome::TimedOut => Some(E2eError::Timeout(format!(
            "scenario '{}' after {} ms",
            spec.name, spec.timeout_ms
        ))),
        RunOutcome::Crashed { stderr } => Some(E2eError::Playwright(
            stderr.lines().last().unwrap_or("node exited with an error").to_string(),
        )),
    }
}

/// File-name safe version of a scenario name
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}
