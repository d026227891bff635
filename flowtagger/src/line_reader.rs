use std::io::{self, BufRead};

/// Reads one line of raw bytes into `line`, without its terminator.
///
/// A line ends at `\n`, `\r` or `\r\n`, the same terminators the csv reader
/// accepts. Bytes are not decoded, so invalid UTF-8 never fails the read.
/// Returns `Ok(false)` once the source is exhausted.
pub fn read_line<R: BufRead>(source: &mut R, line: &mut Vec<u8>) -> io::Result<bool> {
    line.clear();
    let mut read_any = false;

    loop {
        let (terminator, used) = {
            let buf = source.fill_buf()?;
            if buf.is_empty() {
                return Ok(read_any);
            }
            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    line.extend_from_slice(&buf[..i]);
                    (Some(buf[i]), i + 1)
                }
                None => {
                    line.extend_from_slice(buf);
                    (None, buf.len())
                }
            }
        };
        source.consume(used);
        read_any = true;

        if let Some(terminator) = terminator {
            if terminator == b'\r' && source.fill_buf()?.first() == Some(&b'\n') {
                source.consume(1);
            }
            return Ok(true);
        }
    }
}
