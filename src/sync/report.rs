use std::fmt;

/// What a run did with one walked file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// First extraction for a path; record created.
    New,
    /// Changed on disk; tags re-read and merged.
    Updated,
    /// Unchanged since the last run; only touched.
    Unchanged,
    /// No extractor for the file's extension.
    Unsupported,
    /// Extractor could not read the file.
    Failed,
    /// Path is outside the library root.
    Invalid,
}

impl FileOutcome {
    /// Single-character progress marker, if the outcome is worth showing.
    pub fn marker(self) -> Option<char> {
        match self {
            FileOutcome::New => Some('+'),
            FileOutcome::Updated => Some('!'),
            FileOutcome::Unchanged => Some('.'),
            FileOutcome::Failed | FileOutcome::Invalid => Some('?'),
            FileOutcome::Unsupported => None,
        }
    }
}

/// Counts for one completed (or cancelled) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub new: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub unsupported: usize,
    pub failed: usize,
    pub invalid: usize,
    pub deleted: usize,
    /// The run stopped early; nothing was garbage collected.
    pub cancelled: bool,
}

impl SyncReport {
    pub fn record(&mut self, outcome: FileOutcome) {
        let slot = match outcome {
            FileOutcome::New => &mut self.new,
            FileOutcome::Updated => &mut self.updated,
            FileOutcome::Unchanged => &mut self.unchanged,
            FileOutcome::Unsupported => &mut self.unsupported,
            FileOutcome::Failed => &mut self.failed,
            FileOutcome::Invalid => &mut self.invalid,
        };
        *slot += 1;
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new tracks, {} updated, {} removed",
            self.new, self.updated, self.deleted
        )?;
        if self.failed > 0 {
            write!(f, " ({} unreadable)", self.failed)?;
        }
        if self.cancelled {
            f.write_str(" [cancelled]")?;
        }
        Ok(())
    }
}
