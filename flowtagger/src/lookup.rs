use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use csv::{ByteRecord, ReaderBuilder, Trim};
use log::debug;

use crate::{
    error::{Outcome, TaggerError},
    line_reader::read_line,
};

/// Tag given to flows whose port/protocol pair is not in the lookup table.
pub const UNTAGGED: &str = "Untagged";

/// A destination port and protocol name in canonical `"<port>,<protocol>"` form.
///
/// The canonical form is lowercased, so keys built from `"80","TCP"` and
/// `"80","tcp"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey {
    canonical: String,
}

impl LookupKey {
    pub fn new(port: &str, protocol: &str) -> Self {
        LookupKey {
            canonical: format!("{},{}", port, protocol).to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Mapping from port/protocol pair to tag. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<LookupKey, String>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, replacing any earlier tag for the same key.
    pub fn insert(&mut self, key: LookupKey, tag: String) {
        self.entries.insert(key, tag);
    }

    pub fn get(&self, key: &LookupKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the tag for `key`, or [`UNTAGGED`] when there is none.
    pub fn tag_for(&self, key: &LookupKey) -> &str {
        self.get(key).unwrap_or(UNTAGGED)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns one lookup row into a key and tag.
///
/// Rows with fewer than three fields, or with an empty tag, yield `None`.
/// Fields past the third are ignored. Invalid UTF-8 is decoded lossily.
fn parse_row(record: &ByteRecord) -> Option<(LookupKey, String)> {
    if record.len() < 3 {
        return None;
    }
    let port = String::from_utf8_lossy(record.get(0)?);
    let protocol = String::from_utf8_lossy(record.get(1)?);
    let tag = String::from_utf8_lossy(record.get(2)?);
    let tag = tag.trim();
    if tag.is_empty() {
        return None;
    }
    Some((
        LookupKey::new(port.trim(), protocol.trim()),
        tag.to_string(),
    ))
}

/// Loads the lookup table from the file at `path`.
///
/// A file that cannot be opened yields an empty table together with the error.
pub fn load_lookup_table(path: &Path) -> Outcome<LookupTable> {
    debug!("Opening lookup table: {:?}", path);
    match File::open(path) {
        Ok(file) => load_lookup_table_from_reader(file),
        Err(e) => Outcome::degraded(LookupTable::new(), TaggerError::path(path, e)),
    }
}

/// Loads the lookup table from any comma-delimited source.
///
/// The first line is a header and is always discarded, whatever it contains.
/// Every later line is one row split on commas; quotes have no special
/// meaning. A read failure discards the rows loaded so far and yields an
/// empty table.
pub fn load_lookup_table_from_reader<R: Read>(source: R) -> Outcome<LookupTable> {
    let mut source = BufReader::new(source);

    let mut header = Vec::new();
    if let Err(e) = read_line(&mut source, &mut header) {
        return Outcome::degraded(LookupTable::new(), e.into());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(source);

    let mut table = LookupTable::new();
    let mut skipped = 0usize;
    for result in rdr.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => return Outcome::degraded(LookupTable::new(), e.into()),
        };
        match parse_row(&record) {
            Some((key, tag)) => table.insert(key, tag),
            None => skipped += 1,
        }
    }

    debug!(
        "Loaded {} lookup entries ({} rows skipped)",
        table.len(),
        skipped
    );
    Outcome::complete(table)
}
