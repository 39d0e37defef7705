// src/process/aggregate.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::normalize::{FunnelRecord, StageCounts};
use super::schema::Program;

/// One funnel row after duplicate identity keys have been collapsed.
/// Serialized field names are the CSV headers the downstream dashboard
/// expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedRecord {
    #[serde(rename = "Country_Name")]
    pub country_name: String,
    #[serde(rename = "Country_Region")]
    pub country_region: String,
    #[serde(rename = "LC_name")]
    pub lc_name: String,
    #[serde(rename = "Program")]
    pub program: Program,
    #[serde(rename = "Signups")]
    pub signups: u64,
    #[serde(rename = "Applicants")]
    pub applicants: u64,
    #[serde(rename = "Accepted")]
    pub accepted: u64,
    #[serde(rename = "Approved")]
    pub approved: u64,
    #[serde(rename = "Realized")]
    pub realized: u64,
    #[serde(rename = "Finished")]
    pub finished: u64,
    #[serde(rename = "Completed")]
    pub completed: u64,
    #[serde(rename = "Date")]
    pub date: String,
}

impl AggregatedRecord {
    fn new(record: &FunnelRecord, date: &str) -> Self {
        AggregatedRecord {
            country_name: record.country_name.clone(),
            country_region: record.country_region.clone(),
            lc_name: record.lc_name.clone(),
            program: record.program,
            signups: record.counts.signups,
            applicants: record.counts.applicants,
            accepted: record.counts.accepted,
            approved: record.counts.approved,
            realized: record.counts.realized,
            finished: record.counts.finished,
            completed: record.counts.completed,
            date: date.to_string(),
        }
    }

    fn add_counts(&mut self, counts: &StageCounts) {
        self.signups += counts.signups;
        self.applicants += counts.applicants;
        self.accepted += counts.accepted;
        self.approved += counts.approved;
        self.realized += counts.realized;
        self.finished += counts.finished;
        self.completed += counts.completed;
    }
}

/// Collapse the long table to exactly one row per
/// (country, region, LC, program) key by summing the stage counts.
///
/// Key order follows first occurrence in the input. Every row is stamped
/// with `run_date` in `YYYY-MM-DD` form; the date is injected so runs are
/// reproducible under test.
pub fn aggregate(records: &[FunnelRecord], run_date: NaiveDate) -> Vec<AggregatedRecord> {
    let date = run_date.format("%Y-%m-%d").to_string();
    let mut index: HashMap<(String, String, String, Program), usize> = HashMap::new();
    let mut out: Vec<AggregatedRecord> = Vec::new();

    for record in records {
        let key = (
            record.country_name.clone(),
            record.country_region.clone(),
            record.lc_name.clone(),
            record.program,
        );
        match index.get(&key) {
            Some(&at) => out[at].add_counts(&record.counts),
            None => {
                index.insert(key, out.len());
                out.push(AggregatedRecord::new(record, &date));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lc_name: &str, program: Program, signups: u64, applicants: u64) -> FunnelRecord {
        FunnelRecord {
            country_name: "Chile".to_string(),
            country_region: "LAC".to_string(),
            lc_name: lc_name.to_string(),
            program,
            counts: StageCounts {
                signups,
                applicants,
                ..StageCounts::default()
            },
        }
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn duplicate_keys_sum_into_one_row() {
        let records = vec![
            record("LC25", Program::Ogv, 20, 10),
            record("LC31", Program::Ogv, 1, 1),
            record("LC25", Program::Ogv, 5, 2),
        ];
        let aggregated = aggregate(&records, run_date());
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated[0].lc_name, "LC25");
        assert_eq!(aggregated[0].signups, 25);
        assert_eq!(aggregated[0].applicants, 12);
        assert_eq!(aggregated[1].lc_name, "LC31");
    }

    #[test]
    fn same_lc_different_program_stays_separate() {
        let records = vec![
            record("LC25", Program::Ogv, 20, 10),
            record("LC25", Program::Igv, 0, 4),
        ];
        let aggregated = aggregate(&records, run_date());
        assert_eq!(aggregated.len(), 2);
    }

    #[test]
    fn every_row_carries_the_run_date() {
        let records = vec![
            record("LC25", Program::Ogv, 20, 10),
            record("LC31", Program::Igta, 0, 3),
        ];
        for row in aggregate(&records, run_date()) {
            assert_eq!(row.date, "2025-03-14");
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            record("LC25", Program::Ogv, 20, 10),
            record("LC25", Program::Ogv, 5, 2),
            record("LC31", Program::Igv, 0, 4),
        ];
        let once = aggregate(&records, run_date());

        // regroup the already-unique table by the same key
        let as_records: Vec<FunnelRecord> = once
            .iter()
            .map(|row| FunnelRecord {
                country_name: row.country_name.clone(),
                country_region: row.country_region.clone(),
                lc_name: row.lc_name.clone(),
                program: row.program,
                counts: StageCounts {
                    signups: row.signups,
                    applicants: row.applicants,
                    accepted: row.accepted,
                    approved: row.approved,
                    realized: row.realized,
                    finished: row.finished,
                    completed: row.completed,
                },
            })
            .collect();
        let twice = aggregate(&as_records, run_date());
        assert_eq!(twice, once);
    }
}
