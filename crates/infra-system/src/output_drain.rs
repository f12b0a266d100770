// Combined output drain
// Runs on its own blocking thread so a chatty child never stalls on a full pipe

use std::io::{BufRead, BufReader, Read};
use tracing::debug;

/// Read `reader` to EOF, returning every line with a trailing `\n`
///
/// Lines are split on `\n`; a `\r` before it is dropped. Bytes that are not
/// valid UTF-8 are replaced per line with U+FFFD rather than failing the read.
/// A final line without a newline still gets one.
pub fn drain_lines<R: Read>(reader: R) -> std::io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut output = String::new();
    let mut line = Vec::new();
    let mut lines = 0usize;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }

        output.push_str(&String::from_utf8_lossy(&line));
        output.push('\n');
        lines += 1;
    }

    debug!(lines = lines, bytes = output.len(), "Output stream closed");
    Ok(output)
}
