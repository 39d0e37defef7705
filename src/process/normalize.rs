// src/process/normalize.rs

use std::collections::HashMap;
use tracing::debug;

use super::error::{ProcessError, ProcessWarning};
use super::schema::{self, Program, RawColumn, Stage};
use super::{RawLcRow, RawTable};

/// One LC×program row of the long table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelRecord {
    pub country_name: String,
    pub country_region: String,
    pub lc_name: String,
    pub program: Program,
    pub counts: StageCounts,
}

/// Funnel counts for one (LC, program), in pipeline order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub signups: u64,
    pub applicants: u64,
    pub accepted: u64,
    pub approved: u64,
    pub realized: u64,
    pub finished: u64,
    pub completed: u64,
}

/// Output of `normalize`: the long table plus every recoverable finding
/// recorded along the way.
#[derive(Debug)]
pub struct Normalized {
    pub records: Vec<FunnelRecord>,
    pub warnings: Vec<ProcessWarning>,
}

/// Pivot one scraped country table into the long per-(LC, program) form.
///
/// Closed LCs are dropped, subtotal columns are discarded after a
/// cross-check against their program columns, every count cell is coerced
/// to an integer, and each surviving LC contributes exactly one record
/// per program in enumeration order. Record order is program-major with
/// the original row order preserved within each program.
pub fn normalize(table: &RawTable) -> Result<Normalized, ProcessError> {
    let columns = schema::stage_columns();
    let mut warnings = Vec::new();

    // 1) drop closed LCs
    let open: Vec<&RawLcRow> = table
        .rows
        .iter()
        .filter(|row| !schema::CLOSED_MARKERS.contains(&row.status.as_str()))
        .collect();
    debug!(
        country = %table.country_name,
        open = open.len(),
        closed = table.rows.len() - open.len(),
        "filtered closed LCs"
    );

    // 2..5) validate width, coerce counts, cross-check subtotals
    let mut parsed: Vec<(&RawLcRow, HashMap<(Stage, Program), u64>)> =
        Vec::with_capacity(open.len());
    for row in open {
        if row.cells.len() != columns.len() {
            return Err(ProcessError::SchemaMismatch {
                lc_name: row.lc_name.clone(),
                expected: columns.len(),
                found: row.cells.len(),
            });
        }

        let mut totals: HashMap<Stage, u64> = HashMap::new();
        let mut counts: HashMap<(Stage, Program), u64> = HashMap::new();
        for (column, cell) in columns.iter().zip(&row.cells) {
            let value =
                cell.trim()
                    .parse::<u64>()
                    .map_err(|_| ProcessError::InvalidCount {
                        lc_name: row.lc_name.clone(),
                        column: column.name(),
                        value: cell.clone(),
                    })?;
            match *column {
                RawColumn::Total(stage) => {
                    totals.insert(stage, value);
                }
                RawColumn::Count(stage, program) => {
                    counts.insert((stage, program), value);
                }
            }
        }

        for stage in Stage::ALL {
            let sum: u64 = stage
                .programs()
                .iter()
                .map(|&program| counts.get(&(stage, program)).copied().unwrap_or(0))
                .sum();
            let total = totals.get(&stage).copied().unwrap_or(0);
            if total != sum {
                warnings.push(ProcessWarning::TotalMismatch {
                    lc_name: row.lc_name.clone(),
                    stage,
                    total,
                    sum,
                });
            }
        }

        parsed.push((row, counts));
    }

    // 6..7) pivot into per-program records, program-major
    let mut records = Vec::with_capacity(parsed.len() * Program::ALL.len());
    for program in Program::ALL {
        for (row, counts) in &parsed {
            // incoming programs carry no signup column; `get` falls back
            // to the synthesized 0
            let count = |stage: Stage| counts.get(&(stage, program)).copied().unwrap_or(0);
            records.push(FunnelRecord {
                country_name: table.country_name.clone(),
                country_region: table.country_region.clone(),
                lc_name: row.lc_name.clone(),
                program,
                counts: StageCounts {
                    signups: count(Stage::Signups),
                    applicants: count(Stage::Applicants),
                    accepted: count(Stage::Accepted),
                    approved: count(Stage::Approved),
                    realized: count(Stage::Realized),
                    finished: count(Stage::Finished),
                    completed: count(Stage::Completed),
                },
            });
        }
    }

    Ok(Normalized { records, warnings })
}
