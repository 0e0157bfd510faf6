use crate::aggregate::Selection;
use crate::presenter::{SelectionItem, UiRequest, UiResponse};
use crate::CopyError;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;
use tracing::{debug, trace};

const HELP: &str =
    "Commands: <n> or <n>-<m> toggle, a select all, n select none, c copy, q quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Toggle(Vec<usize>),
    SelectAll,
    SelectNone,
    Confirm,
    Quit,
    Help,
}

/// Parses one line of checklist input. Entry numbers are 1-based.
fn parse_command(line: &str, entries: usize) -> Result<Command, String> {
    let line = line.trim();
    match line {
        "a" | "all" => return Ok(Command::SelectAll),
        "n" | "none" => return Ok(Command::SelectNone),
        "c" | "copy" => return Ok(Command::Confirm),
        "q" | "quit" => return Ok(Command::Quit),
        "" | "?" | "h" | "help" => return Ok(Command::Help),
        _ => {}
    }

    let mut indices = Vec::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let (start, end) = match token.split_once('-') {
            Some((start, end)) => (parse_entry(start, entries)?, parse_entry(end, entries)?),
            None => {
                let entry = parse_entry(token, entries)?;
                (entry, entry)
            }
        };
        if start > end {
            return Err(format!("Invalid range: {}", token));
        }
        indices.extend(start..=end);
    }
    Ok(Command::Toggle(indices))
}

fn parse_entry(token: &str, entries: usize) -> Result<usize, String> {
    match token.trim().parse::<usize>() {
        Ok(n) if (1..=entries).contains(&n) => Ok(n - 1),
        _ => Err(format!("Not an entry number between 1 and {}: {}", entries, token)),
    }
}

/// Line-oriented checklist on a terminal. Renders the entries, forwards
/// every change to the presenter and shows the stats it sends back.
pub struct ChecklistUi<R, W> {
    input: Lines<R>,
    output: W,
    items: Vec<SelectionItem>,
    checked: Vec<bool>,
    notice: Option<String>,
    confirm_enabled: bool,
}

impl<R, W> ChecklistUi<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        ChecklistUi {
            input: input.lines(),
            output,
            items: Vec::new(),
            checked: Vec::new(),
            notice: None,
            confirm_enabled: false,
        }
    }

    /// Warning shown above the list, such as files that could not be loaded.
    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    fn selection(&self) -> Selection {
        self.items
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(item, _)| item.identifier.clone())
            .collect()
    }

    fn render_list(&mut self) -> Result<(), CopyError> {
        for (i, (item, checked)) in self.items.iter().zip(&self.checked).enumerate() {
            let mark = if *checked { "x" } else { " " };
            writeln!(self.output, "{:>3}. [{}] {}", i + 1, mark, item.label)?;
        }
        Ok(())
    }

    async fn receive_stats(
        &mut self,
        responses: &mut mpsc::Receiver<UiResponse>,
    ) -> Result<(), CopyError> {
        match responses.recv().await {
            Some(UiResponse::StatsUpdate {
                total_files,
                total_words,
                total_lines,
                confirm_enabled,
            }) => {
                self.confirm_enabled = confirm_enabled;
                writeln!(
                    self.output,
                    "{} files selected, {} words total, {} lines total",
                    total_files, total_words, total_lines
                )?;
                if !confirm_enabled {
                    writeln!(self.output, "Please select at least one file")?;
                }
                Ok(())
            }
            None => Err(CopyError::UiError(
                "presenter stopped sending updates".to_owned(),
            )),
        }
    }

    async fn send(
        &self,
        requests: &mpsc::Sender<UiRequest>,
        request: UiRequest,
    ) -> Result<(), CopyError> {
        requests
            .send(request)
            .await
            .map_err(|e| CopyError::UiError(e.to_string()))
    }

    /// Runs until the user confirms, quits or the input ends. Dropping the
    /// request sender on return tells the presenter the checklist is gone.
    pub async fn run(
        mut self,
        items: Vec<SelectionItem>,
        requests: mpsc::Sender<UiRequest>,
        mut responses: mpsc::Receiver<UiResponse>,
    ) -> Result<(), CopyError> {
        self.checked = vec![true; items.len()];
        self.items = items;

        writeln!(self.output, "Select files to copy")?;
        if let Some(notice) = self.notice.clone() {
            writeln!(self.output, "{}", notice)?;
        }
        self.render_list()?;
        self.receive_stats(&mut responses).await?;
        writeln!(self.output, "{}", HELP)?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let line = match self.input.next_line().await? {
                Some(line) => line,
                None => {
                    debug!("Checklist input ended");
                    return Ok(());
                }
            };
            trace!("Checklist input: {:?}", line);

            let command = match parse_command(&line, self.items.len()) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(self.output, "{}", message)?;
                    continue;
                }
            };

            match command {
                Command::Quit => return Ok(()),
                Command::Help => {
                    writeln!(self.output, "{}", HELP)?;
                    continue;
                }
                Command::Confirm => {
                    if !self.confirm_enabled {
                        writeln!(self.output, "Please select at least one file")?;
                        continue;
                    }
                    let selected = self.selection();
                    self.send(&requests, UiRequest::Confirmed { selected }).await?;
                    return Ok(());
                }
                Command::SelectAll => self.checked.iter_mut().for_each(|c| *c = true),
                Command::SelectNone => self.checked.iter_mut().for_each(|c| *c = false),
                Command::Toggle(indices) => {
                    for i in indices {
                        self.checked[i] = !self.checked[i];
                    }
                }
            }

            self.render_list()?;
            let selected = self.selection();
            self.send(&requests, UiRequest::SelectionChanged { selected })
                .await?;
            self.receive_stats(&mut responses).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_keywords() {
        assert_eq!(parse_command("a", 3), Ok(Command::SelectAll));
        assert_eq!(parse_command(" none ", 3), Ok(Command::SelectNone));
        assert_eq!(parse_command("c", 3), Ok(Command::Confirm));
        assert_eq!(parse_command("q", 3), Ok(Command::Quit));
        assert_eq!(parse_command("", 3), Ok(Command::Help));
    }

    #[test]
    fn test_parse_command_entries_and_ranges() {
        assert_eq!(parse_command("1", 3), Ok(Command::Toggle(vec![0])));
        assert_eq!(parse_command("1 3", 3), Ok(Command::Toggle(vec![0, 2])));
        assert_eq!(parse_command("1-3", 3), Ok(Command::Toggle(vec![0, 1, 2])));
        assert_eq!(parse_command("2,3", 3), Ok(Command::Toggle(vec![1, 2])));
    }

    #[test]
    fn test_parse_command_rejects_out_of_range() {
        assert!(parse_command("0", 3).is_err());
        assert!(parse_command("4", 3).is_err());
        assert!(parse_command("3-1", 3).is_err());
        assert!(parse_command("x", 3).is_err());
    }
}
