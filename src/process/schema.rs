// src/process/schema.rs

use serde::Serialize;
use std::fmt;

/// The six exchange programs, in the fixed enumeration order that drives
/// output row order: incoming first, then outgoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Program {
    #[serde(rename = "IGV")]
    Igv,
    #[serde(rename = "IGTa")]
    Igta,
    #[serde(rename = "IGTe")]
    Igte,
    #[serde(rename = "OGV")]
    Ogv,
    #[serde(rename = "OGTa")]
    Ogta,
    #[serde(rename = "OGTe")]
    Ogte,
}

impl Program {
    pub const ALL: [Program; 6] = [
        Program::Igv,
        Program::Igta,
        Program::Igte,
        Program::Ogv,
        Program::Ogta,
        Program::Ogte,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Program::Igv => "IGV",
            Program::Igta => "IGTa",
            Program::Igte => "IGTe",
            Program::Ogv => "OGV",
            Program::Ogta => "OGTa",
            Program::Ogte => "OGTe",
        }
    }

    /// Incoming programs have no signup stage on the dashboard; their
    /// signup count is always synthesized as 0.
    pub fn is_incoming(self) -> bool {
        matches!(self, Program::Igv | Program::Igta | Program::Igte)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The seven funnel stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Signups,
    Applicants,
    Accepted,
    Approved,
    Realized,
    Finished,
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Signups,
        Stage::Applicants,
        Stage::Accepted,
        Stage::Approved,
        Stage::Realized,
        Stage::Finished,
        Stage::Completed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Signups => "Signups",
            Stage::Applicants => "Applicants",
            Stage::Accepted => "Accepted",
            Stage::Approved => "Approved",
            Stage::Realized => "Realized",
            Stage::Finished => "Finished",
            Stage::Completed => "Completed",
        }
    }

    /// Programs the dashboard tracks at this stage. Signups exist for
    /// outgoing programs only.
    pub fn programs(self) -> &'static [Program] {
        match self {
            Stage::Signups => &[Program::Ogv, Program::Ogta, Program::Ogte],
            _ => &Program::ALL,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One column of the scraped stage block, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawColumn {
    /// Per-stage subtotal. Redundant with the program columns; consulted
    /// for a cross-check and then discarded.
    Total(Stage),
    Count(Stage, Program),
}

impl RawColumn {
    pub fn name(&self) -> String {
        match self {
            RawColumn::Total(stage) => format!("Total {}", stage.name()),
            RawColumn::Count(stage, program) => format!("{} {}", stage.name(), program.code()),
        }
    }
}

/// The fixed layout of a scraped row's stage cells, after the identity
/// cells: for each stage in order, a subtotal column followed by one
/// column per program tracked at that stage.
///
/// Declared once and checked at normalization, instead of being re-derived
/// positionally at every transformation step.
pub fn stage_columns() -> Vec<RawColumn> {
    let mut columns = Vec::new();
    for stage in Stage::ALL {
        columns.push(RawColumn::Total(stage));
        for &program in stage.programs() {
            columns.push(RawColumn::Count(stage, program));
        }
    }
    columns
}

/// Exact strings the dashboard shows for closed LCs. Matching is literal;
/// only these variants are recognized.
pub const CLOSED_MARKERS: [&str; 8] = [
    "[Closed]",
    "Closed",
    "(Closed)",
    "closed",
    "CLOSED",
    "(Closed Expansion)",
    "-",
    ".",
];
