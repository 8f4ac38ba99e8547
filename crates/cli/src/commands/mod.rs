//! CLI Commands

pub mod cases;
pub mod checksum;
pub mod generate;
pub mod scenarios;
pub mod validate;
