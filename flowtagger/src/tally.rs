use std::collections::HashMap;

use crate::args::ReportOrder;

/// Counts per label, remembering the order in which labels were first seen.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to the count for `label`, creating the entry on first sight.
    pub fn increment(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    pub fn get(&self, label: &str) -> u64 {
        self.index
            .get(label)
            .map_or(0, |&i| self.entries[i].1)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }

    /// Entries arranged for a report.
    ///
    /// `Count` sorts by descending count with ties broken by label, `Key` by
    /// label alone.
    pub fn ordered(&self, order: ReportOrder) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        match order {
            ReportOrder::Insertion => {}
            ReportOrder::Count => {
                entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            }
            ReportOrder::Key => entries.sort_by(|a, b| a.0.cmp(b.0)),
        }
        entries
    }
}
