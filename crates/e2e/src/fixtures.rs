//! Pages a scenario can start on

use serde::{Deserialize, Serialize};

use crate::spec::{LoadState, TestStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fixture {
    /// Landing page of the application
    ApplicationPage,
    /// First page of the form, personal details
    FormPage,
}

impl Fixture {
    pub fn path(&self) -> &'static str {
        match self {
            Fixture::ApplicationPage => "/application/",
            Fixture::FormPage => "/application/personal-details",
        }
    }

    /// Navigate to the page and wait for the DOM to load
    pub fn steps(&self) -> Vec<TestStep> {
        vec![
            TestStep::Navigate {
                url: self.path().to_string(),
            },
            TestStep::WaitForLoad {
                state: LoadState::Domcontentloaded,
            },
        ]
    }
}
