use crate::error::{LineError, ParseError};
use crate::scan;
use tracing::trace;

/// What every parsed file reports besides its records.
pub trait ParseOutcome {
    fn errors(&self) -> &[ParseError];

    /// Data lines that were accepted. A line counts once even when it
    /// produces more than one record (runway pairs).
    fn record_count(&self) -> usize;

    fn is_clean(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Feeds every logical line of `text` to `handle` and collects the lines it
/// rejects. Section headers and other state changes return `Ok(())` too.
pub(crate) fn drive<'t, F>(text: &'t str, mut handle: F) -> Vec<ParseError>
where
    F: FnMut(&'t str) -> Result<(), LineError>,
{
    let mut errors = Vec::new();
    for (number, raw) in scan::lines(text) {
        let line = match scan::logical_line(raw) {
            Some(line) => line,
            None => continue,
        };
        if let Err(kind) = handle(line) {
            trace!(line = number, error = %kind, "rejected line");
            errors.push(ParseError::new(number, raw, kind));
        }
    }
    errors
}
