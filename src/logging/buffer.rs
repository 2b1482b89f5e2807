//! In-memory console replacement for tests
//!
//! A thread-safe byte buffer that stands in for stdout, so that everything the
//! facility mirrors to the console can be read back.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Cloneable in-memory writer; all clones share the same bytes
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        self.bytes
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }

    /// Written text split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().map(|b| b.is_empty()).unwrap_or(true)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.bytes.lock() {
            Ok(mut bytes) => {
                bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "buffer lock poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_contents() {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();

        writer.write_all(b"first line\n").unwrap();
        writer.write_all(b"second line\n").unwrap();

        assert_eq!(buffer.lines(), vec!["first line", "second line"]);
        assert!(!buffer.is_empty());
    }
}
