//! Workload Grouper
//!
//! Partitions loaded records by their `workload` label. Labels are compared
//! verbatim and keep the order in which they first appear in the file;
//! records inside a group keep source order.

use crate::record::Record;
use std::collections::HashMap;

/// Records partitioned by workload label
#[derive(Debug, Clone, Default)]
pub struct WorkloadGroups {
    groups: Vec<(String, Vec<Record>)>,
    index: HashMap<String, usize>,
}

impl WorkloadGroups {
    /// Partition records by workload, taking ownership of them
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut groups = Self::default();
        for record in records {
            groups.insert(record);
        }
        groups
    }

    fn insert(&mut self, record: Record) {
        match self.index.get(&record.workload).copied() {
            Some(slot) => self.groups[slot].1.push(record),
            None => {
                self.index.insert(record.workload.clone(), self.groups.len());
                self.groups.push((record.workload.clone(), vec![record]));
            }
        }
    }

    /// Records for a label, if any were loaded
    pub fn get(&self, workload: &str) -> Option<&[Record]> {
        self.index
            .get(workload)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    pub fn contains(&self, workload: &str) -> bool {
        self.index.contains_key(workload)
    }

    /// Labels in first-seen order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(label, _)| label.as_str())
    }

    /// `(label, records)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.groups
            .iter()
            .map(|(label, records)| (label.as_str(), records.as_slice()))
    }

    /// Number of distinct workloads
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }
}
