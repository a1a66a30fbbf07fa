//! NDJSON event output for `--json` mode
//!
//! One JSON object per line on stdout, tagged by `event`. CI consumers match
//! on the tag and ignore events they do not know.

use std::io::{self, Write};

use serde::Serialize;

/// Events emitted over the lifetime of one invocation.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeployEvent<'a> {
    /// Deploy is starting
    Start {
        command: &'static str,
        source: String,
        bucket: &'a str,
        dry_run: bool,
        version_prefix: bool,
    },
    /// One asset landed in the store
    Uploaded { key: &'a str },
    /// Dry run: one asset would land under this key
    Planned { key: &'a str },
    /// Deploy finished
    Done {
        version: &'a str,
        uploaded: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<&'a str>,
    },
    /// `ferry version` output
    Version { version: &'a str },
}

/// Write a single NDJSON event (one JSON object per line).
///
/// Serialization and write failures both surface through the returned
/// `io::Result`; nothing is ever written for an event that failed to
/// serialize.
pub fn write_event(out: &mut impl Write, event: &DeployEvent<'_>) -> io::Result<()> {
    let line = serde_json::to_string(event).map_err(io::Error::from)?;
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes to stdout.
pub fn emit(event: &DeployEvent<'_>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, event)
}
