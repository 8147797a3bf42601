//! Line reading shared by the OBJ and MTL parsers.

use std::io::{self, BufRead};

/// Lines of a reader with invalid UTF-8 replaced by U+FFFD, so a stray
/// Latin-1 byte in a comment does not stop the load. `\n` and `\r\n` are
/// stripped.
pub(crate) struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

pub(crate) fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Text before the first `#`.
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(content, _)| content)
}
