//! loanform E2E suite
//!
//! Drives the remote loan application form through Playwright:
//! - Builds scenarios from the field tables and applicant generator in
//!   `loanform-common`, plus optional declarative YAML specs
//! - Renders each scenario into one Node script and runs it in a fresh browser
//! - Reads per-step JSON reports back and writes a suite result file
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── probe_target() -> RemoteTarget answers               │
//! │    ├── load_specs() -> builtin + YAML ScenarioSpec          │
//! │    ├── run_spec(spec) -> PlaywrightHandle::run              │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioSpec                                               │
//! │    ├── name, description, tags                              │
//! │    ├── fixture: application_page | form_page                │
//! │    └── steps: [TestStep]                                    │
//! │          ├── navigate, wait_for_load, wait_for_url          │
//! │          ├── click, click_label, fill                       │
//! │          └── assert_title, assert_visible, assert_text, ... │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod fixtures;
pub mod playwright;
pub mod runner;
pub mod scenarios;
pub mod spec;
pub mod target;

pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use fixtures::Fixture;
pub use playwright::{Browser, PlaywrightConfig, PlaywrightHandle};
pub use runner::{RunnerConfig, SuiteResult, TestResult, TestRunner};
pub use spec::{ScenarioSpec, TestStep};
pub use target::RemoteTarget;
