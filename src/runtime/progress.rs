use std::io::{self, Write};
use std::path::Path;

use crate::sync::FileOutcome;

/// Prints one marker per walked file to stdout.
pub struct Progress<W: Write> {
    out: W,
    enabled: bool,
    printed: bool,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self {
            out,
            enabled,
            printed: false,
        }
    }

    pub fn observe(&mut self, _path: &Path, outcome: FileOutcome) {
        if !self.enabled {
            return;
        }
        if let Some(marker) = outcome.marker() {
            // Progress output is best-effort; a closed stdout must not abort the run.
            let _ = write!(self.out, "{marker}");
            let _ = self.out.flush();
            self.printed = true;
        }
    }

    /// Terminate the marker line, if any markers were printed.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.printed {
            writeln!(self.out)?;
            self.printed = false;
        }
        self.out.flush()
    }
}
