//! Scenario commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use loanform_e2e::{RunnerConfig, ScenarioSpec, SuiteConfig, SuiteResult, TestRunner};

use crate::output::{
    print_error, print_info, print_list, print_success, OutputFormat, TableDisplay,
};

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List the scenarios the suite would run
    List {
        /// Only scenarios with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Write the built-in scenarios as YAML specs
    Emit {
        /// Target directory
        dir: PathBuf,
    },

    /// Run scenarios against the configured target
    Run {
        /// Only scenarios with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only the scenario with this name
        #[arg(short, long)]
        name: Option<String>,

        /// Override the target origin
        #[arg(long)]
        base_url: Option<String>,

        /// Render scripts instead of running a browser
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct ScenarioDisplay {
    pub name: String,
    pub tags: Vec<String>,
    pub fixture: Option<String>,
    pub steps: usize,
}

impl From<&ScenarioSpec> for ScenarioDisplay {
    fn from(spec: &ScenarioSpec) -> Self {
        Self {
            name: spec.name.clone(),
            tags: spec.tags.clone(),
            fixture: spec.fixture.map(|f| f.path().to_string()),
            steps: spec.all_steps().len(),
        }
    }
}

impl TableDisplay for ScenarioDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Tags", "Start page", "Steps"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.tags.join(", "),
            self.fixture.clone().unwrap_or_default(),
            self.steps.to_string(),
        ]
    }
}

pub async fn execute(cmd: ScenarioCommands, config: SuiteConfig, format: OutputFormat) -> Result<()> {
    match cmd {
        ScenarioCommands::List { tag } => {
            let runner = TestRunner::with_config(RunnerConfig::from(config));
            let specs = runner.load_specs()?;
            let displays: Vec<ScenarioDisplay> = specs
                .iter()
                .filter(|s| tag.as_deref().map_or(true, |t| s.has_tag(t)))
                .map(ScenarioDisplay::from)
                .collect();
            print_list(&displays, format)?;
        }

        ScenarioCommands::Emit { dir } => {
            let specs = loanform_e2e::scenarios::builtin(&config)?;
            let written = emit(&specs, &dir)?;
            print_success(&format!("Wrote {} scenario(s) to {}", written, dir.display()));
        }

        ScenarioCommands::Run {
            tag,
            name,
            base_url,
            dry_run,
        } => {
            let mut config = config;
            if let Some(base_url) = base_url {
                config.base_url = base_url;
                config.validate()?;
            }
            if dry_run {
                print_info("Dry run: rendering scripts only");
            }
            let runner = TestRunner::with_config(RunnerConfig {
                suite: config,
                dry_run,
            });

            let results = match (name, tag) {
                (Some(name), _) => {
                    let result = runner.run_test(&name).await?;
                    SuiteResult {
                        total: 1,
                        passed: usize::from(result.success && !result.skipped),
                        failed: usize::from(!result.success),
                        skipped: usize::from(result.skipped),
                        duration_ms: result.duration_ms,
                        results: vec![result],
                    }
                }
                (None, Some(tag)) => runner.run_tagged(&tag).await?,
                (None, None) => runner.run_all().await?,
            };
            let path = runner.write_results(&results)?;

            print_summary(&results);
            println!("Results: {}", path.display());
            if !results.all_passed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// One YAML file per scenario, named by position so the order survives
pub fn emit(specs: &[ScenarioSpec], dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (index, spec) in specs.iter().enumerate() {
        let path = dir.join(format!("{:03}.yaml", index + 1));
        std::fs::write(&path, spec.to_yaml()?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(specs.len())
}

fn print_summary(results: &SuiteResult) {
    for result in &results.results {
        if result.skipped {
            println!("  {} {}", "-".dimmed(), result.name);
        } else if result.success {
            println!("  {} {} ({} ms)", "✓".green(), result.name, result.duration_ms);
        } else {
            print_error(&format!(
                "{} - {}",
                result.name,
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    println!(
        "{} passed, {} failed, {} skipped ({} ms)",
        results.passed.to_string().green(),
        results.failed.to_string().red(),
        results.skipped,
        results.duration_ms
    );
}
