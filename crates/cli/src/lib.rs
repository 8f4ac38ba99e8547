//! loanform CLI
//!
//! Command-line access to the checksum engine, the field validators, the
//! applicant generator and the scenario suite.

pub mod commands;
pub mod output;
