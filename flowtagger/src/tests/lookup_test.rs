#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read, Write};

    use tempfile::NamedTempFile;

    use crate::{
        error::TaggerError,
        lookup::{load_lookup_table, load_lookup_table_from_reader, LookupKey, UNTAGGED},
    };

    fn key(port: &str, protocol: &str) -> LookupKey {
        LookupKey::new(port, protocol)
    }

    #[test]
    fn test_lookup_key_is_case_insensitive() {
        assert_eq!(key("80", "TCP"), key("80", "tcp"));
        assert_eq!(key("80", "Tcp").as_str(), "80,tcp");
        assert_eq!(key("443", "udp").to_string(), "443,udp");
    }

    #[test]
    fn test_load_rows() {
        let source = "dstport,protocol,tag\n25,TCP,sv_P1\n 443 , tcp , sv_P2 \n";
        let outcome = load_lookup_table_from_reader(Cursor::new(source));

        assert!(outcome.error.is_none());
        let table = outcome.value;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&key("25", "tcp")), Some("sv_P1"));
        assert_eq!(table.get(&key("443", "tcp")), Some("sv_P2"));
    }

    #[test]
    fn test_tag_casing_is_preserved() {
        let table = load_lookup_table_from_reader(Cursor::new("h\n80,TCP,WebTraffic\n")).value;
        assert_eq!(table.tag_for(&key("80", "tcp")), "WebTraffic");
    }

    #[test]
    fn test_header_is_always_discarded() {
        let table = load_lookup_table_from_reader(Cursor::new("80,tcp,web\n443,tcp,secure\n")).value;
        assert_eq!(table.len(), 1);
        assert_eq!(table.tag_for(&key("80", "tcp")), UNTAGGED);
        assert_eq!(table.tag_for(&key("443", "tcp")), "secure");
    }

    #[test]
    fn test_header_is_not_decoded() {
        let mut source = vec![0xff, 0xfe, b'\n'];
        source.extend_from_slice(b"80,tcp,web\n");
        let outcome = load_lookup_table_from_reader(Cursor::new(source));

        assert!(outcome.error.is_none());
        assert_eq!(outcome.value.tag_for(&key("80", "tcp")), "web");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let source = "dstport,protocol,tag\n80,tcp\n\n443,tcp,web\n22\n";
        let outcome = load_lookup_table_from_reader(Cursor::new(source));

        assert!(outcome.error.is_none());
        let table = outcome.value;
        assert_eq!(table.len(), 1);
        assert_eq!(table.tag_for(&key("80", "tcp")), UNTAGGED);
        assert_eq!(table.tag_for(&key("443", "tcp")), "web");
    }

    #[test]
    fn test_rows_with_empty_tag_are_skipped() {
        let table = load_lookup_table_from_reader(Cursor::new("h\n80,tcp,\n81,tcp,  \n")).value;
        assert!(table.is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let table =
            load_lookup_table_from_reader(Cursor::new("h\n110,tcp,email,extra,more\n")).value;
        assert_eq!(table.tag_for(&key("110", "tcp")), "email");
    }

    #[test]
    fn test_later_rows_replace_earlier_ones() {
        let table =
            load_lookup_table_from_reader(Cursor::new("h\n80,tcp,web\n80,TCP,http\n")).value;
        assert_eq!(table.len(), 1);
        assert_eq!(table.tag_for(&key("80", "tcp")), "http");
    }

    #[test]
    fn test_quotes_are_plain_characters() {
        let source = "dstport,protocol,tag\r\n\"993\",\"TCP\",\"email, secure\"\r\n";
        let table = load_lookup_table_from_reader(Cursor::new(source)).value;

        assert_eq!(table.len(), 1);
        assert_eq!(table.tag_for(&key("993", "tcp")), UNTAGGED);
        assert_eq!(table.tag_for(&key("\"993\"", "\"tcp\"")), "\"email");
    }

    #[test]
    fn test_unbalanced_quote_does_not_swallow_later_rows() {
        let source = "dstport,protocol,tag\n80,tcp,\"web\n443,tcp,https\n25,tcp,mail\n";
        let outcome = load_lookup_table_from_reader(Cursor::new(source));

        assert!(outcome.error.is_none());
        let table = outcome.value;
        assert_eq!(table.len(), 3);
        assert_eq!(table.tag_for(&key("80", "tcp")), "\"web");
        assert_eq!(table.tag_for(&key("443", "tcp")), "https");
        assert_eq!(table.tag_for(&key("25", "tcp")), "mail");
    }

    #[test]
    fn test_crlf_line_endings() {
        let source = "dstport,protocol,tag\r\n80,tcp,web\r\n443,tcp,https\r\n";
        let table = load_lookup_table_from_reader(Cursor::new(source)).value;
        assert_eq!(table.len(), 2);
        assert_eq!(table.tag_for(&key("443", "tcp")), "https");
    }

    #[test]
    fn test_cr_only_line_endings() {
        let source = "dstport,protocol,tag\r80,tcp,web\r443,tcp,https\r";
        let outcome = load_lookup_table_from_reader(Cursor::new(source));

        assert!(outcome.error.is_none());
        assert_eq!(outcome.value.len(), 2);
        assert_eq!(outcome.value.tag_for(&key("80", "tcp")), "web");
    }

    #[test]
    fn test_empty_source_gives_empty_table() {
        let outcome = load_lookup_table_from_reader(Cursor::new(""));
        assert!(outcome.error.is_none());
        assert!(outcome.value.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut source = b"h\n443,tcp,https".to_vec();
        source.extend_from_slice(&[0xff, b'\n']);
        source.extend_from_slice(b"80,tcp,web\n");
        let outcome = load_lookup_table_from_reader(Cursor::new(source));

        assert!(outcome.error.is_none());
        let table = outcome.value;
        assert_eq!(table.len(), 2);
        assert_eq!(table.tag_for(&key("443", "tcp")), "https\u{FFFD}");
        assert_eq!(table.tag_for(&key("80", "tcp")), "web");
    }

    /// Serves `data`, then fails every read.
    struct BrokenSource {
        data: Cursor<Vec<u8>>,
    }

    impl Read for BrokenSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "device gone")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_failure_gives_empty_table() {
        let source = BrokenSource {
            data: Cursor::new(b"h\n80,tcp,web\n443,tcp,https\n".to_vec()),
        };
        let outcome = load_lookup_table_from_reader(source);

        assert!(outcome.error.is_some());
        assert!(outcome.value.is_empty());
    }

    #[test]
    fn test_read_failure_in_header_gives_empty_table() {
        let source = BrokenSource {
            data: Cursor::new(b"dstport,proto".to_vec()),
        };
        let outcome = load_lookup_table_from_reader(source);

        assert!(matches!(outcome.error, Some(TaggerError::Io(_))));
        assert!(outcome.value.is_empty());
    }

    #[test]
    fn test_missing_file_gives_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_lookup_table(&dir.path().join("missing.csv"));

        assert!(matches!(outcome.error, Some(TaggerError::Path { .. })));
        assert!(outcome.value.is_empty());
    }

    #[test]
    fn test_loading_twice_gives_equal_tables() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "dstport,protocol,tag\n80,tcp,web\n443,tcp,web\n68,udp,dhcp\n").unwrap();
        file.flush().unwrap();

        let first = load_lookup_table(file.path());
        let second = load_lookup_table(file.path());

        assert!(first.error.is_none());
        assert_eq!(first.value.len(), 3);
        assert_eq!(first.value, second.value);
    }
}
