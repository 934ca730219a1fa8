//! Progress output
//!
//! The importer reports what it does as plain lines handed to an
//! [`EchoSink`]. The CLI prints them; tests collect them.

use tracing::info;

/// Receives human-readable progress lines.
pub trait EchoSink {
    fn echo(&mut self, line: &str);
}

/// Forwards progress lines to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingEcho;

impl EchoSink for TracingEcho {
    fn echo(&mut self, line: &str) {
        info!(target: "modimp::echo", "{line}");
    }
}

/// Discards progress lines.
#[derive(Debug, Default)]
pub struct SilentEcho;

impl EchoSink for SilentEcho {
    fn echo(&mut self, _line: &str) {}
}

impl EchoSink for Vec<String> {
    fn echo(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Progress line for the `number`-th source applied to a target.
///
/// Continuation sources of a multi-source record are marked with `+`.
pub fn source_line(number: usize, continuation: bool, source: &str) -> String {
    let digits = number.to_string().len();
    let pad = usize::from(!continuation) + 5usize.saturating_sub(digits);
    let marker = if continuation { " +" } else { "" };
    format!(" #{number}{marker}{}{source}", " ".repeat(pad))
}
