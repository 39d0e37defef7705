// src/process/rates.rs

use serde::Serialize;

use super::aggregate::AggregatedRecord;
use super::error::ProcessWarning;
use super::schema::Program;

/// Stage-to-stage conversion percentages for one (country, LC, program).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRecord {
    #[serde(rename = "Country_Name")]
    pub country_name: String,
    #[serde(rename = "Country_Region")]
    pub country_region: String,
    #[serde(rename = "LC_name")]
    pub lc_name: String,
    #[serde(rename = "Program")]
    pub program: Program,
    #[serde(rename = "CR_AP_SU")]
    pub cr_ap_su: f64,
    #[serde(rename = "CR_AC_AP")]
    pub cr_ac_ap: f64,
    #[serde(rename = "CR_APD_AC")]
    pub cr_apd_ac: f64,
    #[serde(rename = "CR_RE_APD")]
    pub cr_re_apd: f64,
    #[serde(rename = "CR_FI_RE")]
    pub cr_fi_re: f64,
    #[serde(rename = "CR_CO_FI")]
    pub cr_co_fi: f64,
}

/// Output of `compute_rates`: one record per input row plus any per-row
/// recoveries.
#[derive(Debug)]
pub struct Rates {
    pub records: Vec<ConversionRecord>,
    pub warnings: Vec<ProcessWarning>,
}

/// Each stage divided by its immediate predecessor, as a percentage.
/// A zero denominator yields 0 by convention, not null. A row whose
/// ratios come out non-finite is emitted with all six rates zeroed and a
/// warning recorded; one bad row never aborts the batch.
pub fn compute_rates(rows: &[AggregatedRecord]) -> Rates {
    let mut records = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();

    for row in rows {
        let mut ratios = [
            ratio(row.applicants, row.signups),
            ratio(row.accepted, row.applicants),
            ratio(row.approved, row.accepted),
            ratio(row.realized, row.approved),
            ratio(row.finished, row.realized),
            ratio(row.completed, row.finished),
        ];
        if !ratios.iter().all(|r| r.is_finite()) {
            warnings.push(ProcessWarning::RateComputation {
                country_name: row.country_name.clone(),
                lc_name: row.lc_name.clone(),
                program: row.program,
            });
            ratios = [0.0; 6];
        }

        records.push(ConversionRecord {
            country_name: row.country_name.clone(),
            country_region: row.country_region.clone(),
            lc_name: row.lc_name.clone(),
            program: row.program,
            cr_ap_su: ratios[0],
            cr_ac_ap: ratios[1],
            cr_apd_ac: ratios[2],
            cr_re_apd: ratios[3],
            cr_fi_re: ratios[4],
            cr_co_fi: ratios[5],
        });
    }

    Rates { records, warnings }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}
