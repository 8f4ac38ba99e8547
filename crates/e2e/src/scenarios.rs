//! Built-in scenarios for the loan application form
//!
//! Field scenarios take their expected UI state from the validators in
//! `loanform-common`, so the browser checks and the core rules cannot drift
//! apart silently. A table row may override that with what the live form
//! shows.

use loanform_common::applicant::{APPROVED_INCOME_SEQUENCE, LOW_INCOME_SEQUENCE};
use loanform_common::cases::{cases_for, Expected, FieldCase, BIRTH_DATE_CASES};
use loanform_common::{
    ApplicantGenerator, Economy, ExpectedOutcome, FormField, LoanApplication, Occupation,
};
use tracing::debug;

use crate::config::SuiteConfig;
use crate::error::E2eResult;
use crate::fixtures::Fixture;
use crate::spec::{ScenarioSpec, TestStep};

/// Monthly income that gets an eligible applicant approved
pub const APPROVED_INCOME: u32 = 30_000;

/// Monthly income too low for approval
pub const LOW_INCOME: u32 = 10_000;

const SUBMIT_SELECTOR: &str = "//button[@type='submit']";
const OCCUPATION_SELECTOR: &str = "ul > li";
const STATUS_URL_PATTERN: &str = "**/status";

pub mod tags {
    pub const SANITY: &str = "sanity";
    pub const FIELD: &str = "field";
    pub const APPLICATION: &str = "application";
}

/// The landing page is up and leads to the form
pub fn sanity(config: &SuiteConfig) -> Vec<ScenarioSpec> {
    let messages = &config.messages;
    vec![
        ScenarioSpec::new("Check that app is online", Fixture::ApplicationPage)
            .tag(tags::SANITY)
            .step(TestStep::AssertTitle {
                pattern: messages.title_pattern.clone(),
            }),
        ScenarioSpec::new("Redirect to the form", Fixture::ApplicationPage)
            .tag(tags::SANITY)
            .step(TestStep::ClickLabel {
                label: messages.apply_label.clone(),
            })
            .step(TestStep::AssertTitle {
                pattern: messages.title_pattern.clone(),
            })
            .step(TestStep::AssertText {
                text: messages.form_heading.clone(),
                visible: true,
            })
            .step(TestStep::AssertVisible {
                selector: "#personal-details-form".to_string(),
                visible: true,
            }),
    ]
}

/// Field name used in scenario titles
pub fn field_title(field: FormField) -> &'static str {
    match field {
        FormField::Mobile => "Mobilenummer",
        FormField::Email | FormField::NationalNumber => field.input_id(),
    }
}

/// One scenario per table row: fill the field, then check its inline error
pub fn field_case(case: &FieldCase, config: &SuiteConfig) -> ScenarioSpec {
    let field = case.field;
    let spec = ScenarioSpec::new(
        format!("Use {} to {} field", case.candidate, field_title(field)),
        Fixture::FormPage,
    )
    .describe(case.note)
    .tag(tags::FIELD)
    .tag(&field.to_string())
    .step(TestStep::Fill {
        selector: field.input_selector(),
        value: case.candidate.to_string(),
    });

    let shown = |visible| TestStep::AssertVisible {
        selector: field.error_selector(),
        visible,
    };
    match case.ui_expectation() {
        Expected::Accepted => spec.step(shown(false)),
        Expected::Rejected => spec.step(shown(true)),
        Expected::RejectedMobile(rejection) => {
            spec.step(shown(true)).step(TestStep::AssertContainsText {
                selector: field.error_selector(),
                text: config.messages.mobile(rejection).to_string(),
            })
        }
    }
}

pub fn field_table(field: FormField, config: &SuiteConfig) -> Vec<ScenarioSpec> {
    cases_for(field)
        .iter()
        .map(|case| field_case(case, config))
        .collect()
}

/// Walk the form from personal details to the status page
pub fn application_flow(
    name: String,
    application: &LoanApplication,
    expected: ExpectedOutcome,
    config: &SuiteConfig,
) -> ScenarioSpec {
    let applicant = &application.applicant;
    let economy = &application.economy;
    let submit = || TestStep::Click {
        selector: SUBMIT_SELECTOR.to_string(),
        nth: None,
        delay_ms: Some(config.timing.submit_delay_ms),
    };
    let fill = |selector: &str, value: String| TestStep::Fill {
        selector: selector.to_string(),
        value,
    };

    ScenarioSpec::new(name, Fixture::FormPage)
        .describe(format!(
            "{} kr monthly income, {} kr costs, expecting {:?}",
            economy.monthly_income,
            economy.total_costs(),
            expected
        ))
        .tag(tags::APPLICATION)
        .step(fill(&FormField::Email.input_selector(), applicant.email.clone()))
        .step(fill(&FormField::Mobile.input_selector(), applicant.mobile.to_string()))
        .step(fill(
            &FormField::NationalNumber.input_selector(),
            applicant.national_number.to_string(),
        ))
        .step(submit())
        .step(TestStep::Click {
            selector: OCCUPATION_SELECTOR.to_string(),
            nth: Some(application.occupation.index),
            delay_ms: None,
        })
        .step(TestStep::AssertChecked {
            selector: format!(
                "//input[@type='radio'][@value='{}']",
                application.occupation.value
            ),
        })
        .step(submit())
        .step(fill("#monthlyIncome", economy.monthly_income.to_string()))
        .step(fill("#monthlyHouseCost", economy.monthly_house_cost.to_string()))
        .step(fill("#transportationCost", economy.transportation_cost.to_string()))
        .step(fill("#otherLoanCost", economy.other_loan_cost.to_string()))
        .step(submit())
        .step(TestStep::WaitForUrl {
            pattern: STATUS_URL_PATTERN.to_string(),
            timeout_ms: config.timing.status_timeout_ms,
        })
        .step(TestStep::AssertText {
            text: config.messages.approved.clone(),
            visible: expected == ExpectedOutcome::Approved,
        })
}

/// Two applications per birth date: one with enough income, one without
pub fn birth_date_flows(
    generator: &mut ApplicantGenerator,
    config: &SuiteConfig,
) -> E2eResult<Vec<ScenarioSpec>> {
    let mut specs = Vec::with_capacity(BIRTH_DATE_CASES.len() * 2);

    for case in BIRTH_DATE_CASES {
        let runs = [
            (
                APPROVED_INCOME_SEQUENCE,
                "01",
                APPROVED_INCOME,
                ExpectedOutcome::from_approved(case.approved),
            ),
            (LOW_INCOME_SEQUENCE, "02", LOW_INCOME, ExpectedOutcome::NotApproved),
        ];

        for (sequence, suffix, income, expected) in runs {
            let applicant = generator.applicant(case.birth_date, sequence, suffix)?;
            let name = format!(
                "Using {} as national number and {} Kr monthly income",
                applicant.national_number,
                format_kronor(income)
            );
            debug!("Built application scenario: {} ({})", name, case.note);
            let application = LoanApplication {
                applicant,
                occupation: Occupation::student(),
                economy: Economy::income_only(income),
            };
            specs.push(application_flow(name, &application, expected, config));
        }
    }

    Ok(specs)
}

/// Every built-in scenario, in the order the suite runs them
pub fn builtin(config: &SuiteConfig) -> E2eResult<Vec<ScenarioSpec>> {
    let generator = match config.seed {
        Some(seed) => ApplicantGenerator::with_seed(seed),
        None => ApplicantGenerator::new(),
    };
    let mut generator = generator.with_provider(&config.email_provider)?;

    let mut specs = sanity(config);
    for field in FormField::ALL {
        specs.extend(field_table(field, config));
    }
    specs.extend(birth_date_flows(&mut generator, config)?);

    let scenario_timeout = config.timing.scenario_timeout_ms;
    let viewport = config.browser.viewport;
    for spec in &mut specs {
        spec.timeout_ms = scenario_timeout;
        spec.viewport = viewport;
    }

    Ok(specs)
}

/// `30000` -> `30.000`, the way amounts are written on the form
fn format_kronor(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
