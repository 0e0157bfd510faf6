use crate::aggregate::{AggregationResult, StatsOnlyResult};
use crate::CopyError;
use arboard::Clipboard;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, trace, warn};

/// Destination for the concatenated text. A write either replaces the
/// previous content completely or leaves it untouched.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError>;

    fn destination(&self) -> &'static str {
        "clipboard"
    }
}

pub trait NotificationSink {
    fn show_info(&self, message: &str);
    fn show_warning(&self, message: &str);
}

pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, CopyError> {
        debug!("Initializing clipboard");
        let clipboard =
            Clipboard::new().map_err(|e| CopyError::ClipboardInitFailed(e.to_string()))?;
        Ok(SystemClipboard { clipboard })
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        self.clipboard
            .set_text(text)
            .map_err(|e| CopyError::ClipboardWriteFailed(e.to_string()))
    }
}

/// Writes the text to a stream instead of the clipboard, for terminals
/// without a clipboard.
pub struct StdoutSink<W> {
    writer: W,
}

impl<W: Write> StdoutSink<W> {
    pub fn new(writer: W) -> Self {
        StdoutSink { writer }
    }
}

impl<W: Write> ClipboardSink for StdoutSink<W> {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|e| CopyError::ClipboardWriteFailed(e.to_string()))
    }

    fn destination(&self) -> &'static str {
        "stdout"
    }
}

/// Reports notifications through the log.
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn show_info(&self, message: &str) {
        info!("{}", message);
    }

    fn show_warning(&self, message: &str) {
        warn!("{}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub total_files: usize,
    pub total_words: usize,
    pub total_lines: usize,
    pub excluded: Vec<String>,
}

pub fn summary_message(stats: &StatsOnlyResult, destination: &str) -> String {
    format!(
        "Copied {} words, {} files, {} lines to {}!",
        stats.total_words, stats.total_files, stats.total_lines, destination
    )
}

pub fn excluded_message(excluded: &[String]) -> Option<String> {
    if excluded.is_empty() {
        return None;
    }
    Some(format!(
        "The following files were skipped due to line limit: {}",
        excluded.join(", ")
    ))
}

/// Writes the text, then reports totals and any files skipped for size.
/// Nothing is reported when the write fails.
pub fn deliver(
    result: AggregationResult,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn NotificationSink,
) -> Result<DeliveryOutcome, CopyError> {
    trace!("Final content length: {}", result.concatenated_text.len());
    clipboard.write_text(&result.concatenated_text)?;

    let stats = result.stats();
    notifier.show_info(&summary_message(&stats, clipboard.destination()));
    if let Some(warning) = excluded_message(&result.excluded_identifiers) {
        notifier.show_warning(&warning);
    }

    Ok(DeliveryOutcome {
        total_files: stats.total_files,
        total_words: stats.total_words,
        total_lines: stats.total_lines,
        excluded: result.excluded_identifiers,
    })
}

/// Prints the outcome as JSON. When the copied text itself went to stdout
/// the summary goes to `stderr` so the two never mix.
pub fn write_summary_json(
    outcome: &DeliveryOutcome,
    text_on_stdout: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), CopyError> {
    let json = serde_json::to_string_pretty(outcome)
        .map_err(|e| CopyError::IoError(e.to_string()))?;
    let writer: &mut dyn Write = if text_on_stdout { stderr } else { stdout };
    writeln!(writer, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_sink_writes_text_verbatim() {
        let mut buffer = Vec::new();
        {
            let mut sink = StdoutSink::new(&mut buffer);
            sink.write_text("\n----- a.txt -----\n\nhi\n").unwrap();
            assert_eq!(sink.destination(), "stdout");
        }
        assert_eq!(String::from_utf8(buffer).unwrap(), "\n----- a.txt -----\n\nhi\n");
    }

    #[test]
    fn test_json_summary_stays_out_of_stdout_copy() {
        let result = AggregationResult {
            concatenated_text: "\n----- a.txt -----\n\nhello world\n".to_string(),
            total_words: 2,
            total_lines: 1,
            total_files: 1,
            ..AggregationResult::default()
        };
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let outcome = {
            let mut sink = StdoutSink::new(&mut stdout);
            deliver(result, &mut sink, &LogNotifier).unwrap()
        };
        write_summary_json(&outcome, true, &mut stdout, &mut stderr).unwrap();

        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "\n----- a.txt -----\n\nhello world\n"
        );
        let summary: serde_json::Value = serde_json::from_slice(&stderr).unwrap();
        assert_eq!(summary["total_files"], 1);
        assert_eq!(summary["excluded"], serde_json::json!([]));
    }

    #[test]
    fn test_json_summary_uses_stdout_when_copying_to_clipboard() {
        let outcome = DeliveryOutcome {
            total_files: 0,
            total_words: 0,
            total_lines: 0,
            excluded: Vec::new(),
        };
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        write_summary_json(&outcome, false, &mut stdout, &mut stderr).unwrap();

        assert!(stderr.is_empty());
        assert!(String::from_utf8(stdout).unwrap().contains("\"total_files\": 0"));
    }

    #[test]
    fn test_messages() {
        let stats = StatsOnlyResult {
            total_words: 5,
            total_files: 2,
            total_lines: 4,
        };
        assert_eq!(
            summary_message(&stats, "clipboard"),
            "Copied 5 words, 2 files, 4 lines to clipboard!"
        );
        assert_eq!(excluded_message(&[]), None);
        assert_eq!(
            excluded_message(&["big.log".to_string(), "huge.csv".to_string()]).unwrap(),
            "The following files were skipped due to line limit: big.log, huge.csv"
        );
    }
}
