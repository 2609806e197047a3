//! Plain terminal rendering of the live incident view.
//!
//! Each refresh clears the screen, prints a header with the timestamp and the
//! number of live incidents, then one line per incident linking to the
//! dashboard.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use incli_core::formatting::{incident_link, live_header};
use incli_core::Result;
use incli_runtime::watch::{LiveSnapshot, SnapshotRenderer};

/// Text lines for one snapshot, header first.
pub fn render_lines(snapshot: &LiveSnapshot) -> Vec<String> {
    let org = snapshot.organization.as_deref().unwrap_or_default();

    let mut lines = Vec::with_capacity(snapshot.incidents.len() + 1);
    lines.push(live_header(&snapshot.taken_at, snapshot.incidents.len()));
    for inc in &snapshot.incidents {
        lines.push(format!(
            "{} {} ... {} status {}",
            inc.reference,
            incident_link(org, &inc.reference),
            inc.name,
            inc.incident_status.name
        ));
    }
    lines
}

/// Renders snapshots to a terminal-like writer, clearing it first.
pub struct TerminalView<W: Write> {
    out: W,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SnapshotRenderer for TerminalView<W> {
    fn render(&mut self, snapshot: &LiveSnapshot) -> Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in render_lines(snapshot) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
