//! Last-resort output for bytes that cannot reach the log file

use std::fmt;
use std::io::Write;

use parking_lot::Mutex;

/// Shared sink for rejected or unwritable bytes
pub struct Fallback {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Fallback {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Best-effort copy of `bytes`; failures are ignored
    pub fn emit(&self, bytes: &[u8]) {
        let mut out = self.out.lock();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallback").finish_non_exhaustive()
    }
}
