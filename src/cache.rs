//! Timestamp-based staleness check for incremental builds.
//!
//! Running the notebook converter is the bottleneck of a build: nbconvert
//! starts a Python interpreter per notebook. A post is re-rendered only when
//! its notebook has been modified since the rendered HTML was written.
//!
//! The check is a single comparison: the rendered file is up to date iff it
//! exists and its modification time is strictly newer than the notebook's.
//! Template edits are not tracked; pass `--force` to the `build` command to
//! re-render everything.

use std::fmt;
use std::io;
use std::path::Path;

/// Whether `output` was written after `source` was last modified.
///
/// A missing output is never up to date. A missing source is an error, since
/// there is nothing to compare against.
pub fn is_up_to_date(source: &Path, output: &Path) -> io::Result<bool> {
    let source_mtime = source.metadata()?.modified()?;
    let output_mtime = match output.metadata() {
        Ok(meta) => meta.modified()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    Ok(output_mtime > source_mtime)
}

/// Summary of render work for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub rendered: u32,
    pub skipped: u32,
}

impl RenderStats {
    pub fn render(&mut self) {
        self.rendered += 1;
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn total(&self) -> u32 {
        self.rendered + self.skipped
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped > 0 {
            write!(
                f,
                "{} up to date, {} rendered ({} total)",
                self.skipped,
                self.rendered,
                self.total()
            )
        } else {
            write!(f, "{} rendered", self.rendered)
        }
    }
}
