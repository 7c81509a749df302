//! Line counting.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Count the lines in a file.
pub fn count_lines(path: &Path) -> io::Result<u64> {
    count_lines_in(File::open(path)?)
}

/// Count the lines produced by a reader.
///
/// `\n`, `\r\n` and a lone `\r` each end a line. A final line without a
/// terminator still counts, so `"a\nb"` has two lines and `""` has none.
pub fn count_lines_in<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut buf = [0u8; 64 * 1024];
    let mut lines = 0u64;
    let mut last: Option<u8> = None;

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        for &byte in &buf[..read] {
            match byte {
                // Second half of \r\n, already counted.
                b'\n' if last == Some(b'\r') => {}
                b'\n' | b'\r' => lines += 1,
                _ => {}
            }
            last = Some(byte);
        }
    }

    if last.is_some_and(|b| b != b'\n' && b != b'\r') {
        lines += 1;
    }

    Ok(lines)
}
