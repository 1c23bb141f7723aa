//! Scenario-based tests for complete runs

mod helpers;
mod scenarios;
