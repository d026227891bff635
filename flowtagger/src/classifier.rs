use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;

use crate::{
    args::FieldLayout,
    error::{Outcome, TaggerError},
    line_reader::read_line,
    lookup::{LookupKey, LookupTable},
    tally::Tally,
};

/// Maps a raw protocol identifier to the name used in lookup keys.
///
/// Only the IANA numbers for TCP and UDP are translated; anything else is
/// passed through lowercased, so `"1"` stays `"1"` and `"ICMP"` becomes `"icmp"`.
pub fn normalize_protocol(raw: &str) -> String {
    match raw {
        "6" => "tcp".to_string(),
        "17" => "udp".to_string(),
        other => other.to_lowercase(),
    }
}

/// The fields of a flow-log line that take part in classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRecord<'a> {
    pub destination_port: &'a str,
    pub protocol: &'a str,
}

impl<'a> FlowRecord<'a> {
    /// Extracts the port and protocol fields from a space-delimited line.
    ///
    /// Returns `None` when the line is too short for `layout`. Trailing spaces
    /// do not add fields.
    pub fn parse(line: &'a str, layout: &FieldLayout) -> Option<Self> {
        let fields: Vec<&str> = line.trim_end_matches(' ').split(' ').collect();
        if fields.len() < layout.min_fields {
            return None;
        }
        Some(FlowRecord {
            destination_port: fields.get(layout.port_field).copied()?,
            protocol: fields.get(layout.protocol_field).copied()?,
        })
    }

    pub fn key(&self) -> LookupKey {
        LookupKey::new(self.destination_port, &normalize_protocol(self.protocol))
    }
}

/// Running counts for one classification pass.
#[derive(Debug, Clone, Default)]
pub struct Tallies {
    pub tags: Tally,
    pub port_protocol: Tally,
    pub valid_records: u64,
    pub skipped_records: u64,
}

impl Tallies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one classified record under its tag and its port/protocol key.
    pub fn record(&mut self, tag: &str, key: &LookupKey) {
        self.tags.increment(tag);
        self.port_protocol.increment(key.as_str());
        self.valid_records += 1;
    }

    pub fn skip(&mut self) {
        self.skipped_records += 1;
    }

    /// Both tallies account for exactly the valid records seen.
    pub fn is_consistent(&self) -> bool {
        self.tags.total() == self.valid_records
            && self.port_protocol.total() == self.valid_records
    }
}

/// Classifies every record of the flow log at `path`.
pub fn classify_flow_log(
    path: &Path,
    table: &LookupTable,
    layout: &FieldLayout,
) -> Outcome<Tallies> {
    debug!("Opening flow log: {:?}", path);
    match File::open(path) {
        Ok(file) => classify_records(BufReader::new(file), table, layout),
        Err(e) => Outcome::degraded(Tallies::new(), TaggerError::path(path, e)),
    }
}

/// Classifies flow-log lines in order, skipping lines that are too short.
///
/// Invalid UTF-8 is decoded lossily. A read failure stops the pass; counts
/// gathered up to that point are kept.
pub fn classify_records<R: BufRead>(
    mut source: R,
    table: &LookupTable,
    layout: &FieldLayout,
) -> Outcome<Tallies> {
    let mut tallies = Tallies::new();

    let mut buf = Vec::new();
    loop {
        match read_line(&mut source, &mut buf) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Outcome::degraded(tallies, e.into()),
        }
        let line = String::from_utf8_lossy(&buf);
        match FlowRecord::parse(&line, layout) {
            Some(record) => {
                let key = record.key();
                tallies.record(table.tag_for(&key), &key);
            }
            None => tallies.skip(),
        }
    }

    debug!(
        "Classified {} flow records ({} skipped)",
        tallies.valid_records, tallies.skipped_records
    );
    Outcome::complete(tallies)
}
