// src/process/error.rs

use super::schema::{Program, Stage};
use std::fmt;
use thiserror::Error;

/// Table-fatal contract violations. No partial output is a valid
/// normalized table, so these propagate to the caller, which decides
/// whether to skip the offending country or abort the run.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("no `table#signups-table` in page")]
    MissingTable,

    #[error("row `{lc_name}` has {found} stage cells, schema expects {expected}")]
    SchemaMismatch {
        lc_name: String,
        expected: usize,
        found: usize,
    },

    #[error("row `{lc_name}`, column `{column}`: `{value}` is not a count")]
    InvalidCount {
        lc_name: String,
        column: String,
        value: String,
    },
}

/// Recoverable findings, returned to the caller alongside the output so
/// nothing is dropped or zeroed without a record of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessWarning {
    /// A stage subtotal disagreed with the sum of its program columns.
    /// The per-program values are trusted and the row is kept.
    TotalMismatch {
        lc_name: String,
        stage: Stage,
        total: u64,
        sum: u64,
    },
    /// Conversion rates for one row could not be computed; the row was
    /// emitted with all six rates set to 0.
    RateComputation {
        country_name: String,
        lc_name: String,
        program: Program,
    },
}

impl fmt::Display for ProcessWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessWarning::TotalMismatch {
                lc_name,
                stage,
                total,
                sum,
            } => write!(
                f,
                "row `{lc_name}`: `Total {stage}` is {total} but program columns sum to {sum}"
            ),
            ProcessWarning::RateComputation {
                country_name,
                lc_name,
                program,
            } => write!(
                f,
                "conversion rates for {country_name}/{lc_name}/{program} could not be computed; zeroed"
            ),
        }
    }
}
