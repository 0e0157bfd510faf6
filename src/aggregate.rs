use crate::document::Document;
use crate::metrics::{count_lines, count_words, exceeds_line_limit};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Identifiers the user has checked, in the order they were added.
/// Adding an identifier that is already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Selection {
    identifiers: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    /// Selects every document, in document order.
    pub fn all(documents: &[Document]) -> Self {
        documents
            .iter()
            .map(|d| d.identifier().to_owned())
            .collect()
    }

    pub fn insert(&mut self, identifier: impl Into<String>) -> bool {
        let identifier = identifier.into();
        if self.contains(&identifier) {
            return false;
        }
        self.identifiers.push(identifier);
        true
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for identifier in iter {
            selection.insert(identifier);
        }
        selection
    }
}

impl From<Vec<String>> for Selection {
    fn from(identifiers: Vec<String>) -> Self {
        identifiers.into_iter().collect()
    }
}

impl From<Selection> for Vec<String> {
    fn from(selection: Selection) -> Self {
        selection.identifiers
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub concatenated_text: String,
    pub excluded_identifiers: Vec<String>,
    pub total_words: usize,
    pub total_lines: usize,
    pub total_files: usize,
}

impl AggregationResult {
    pub fn stats(&self) -> StatsOnlyResult {
        StatsOnlyResult {
            total_words: self.total_words,
            total_lines: self.total_lines,
            total_files: self.total_files,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsOnlyResult {
    pub total_words: usize,
    pub total_lines: usize,
    pub total_files: usize,
}

impl StatsOnlyResult {
    fn add(&mut self, text: &str) {
        self.total_words += count_words(text);
        self.total_lines += count_lines(text);
        self.total_files += 1;
    }
}

pub fn banner(identifier: &str) -> String {
    format!("\n----- {} -----\n\n", identifier)
}

fn selected<'a>(
    documents: &'a [Document],
    selection: &'a Selection,
) -> impl Iterator<Item = &'a Document> + 'a {
    let wanted: HashSet<&str> = selection.iter().collect();
    documents
        .iter()
        .filter(move |d| wanted.contains(d.identifier()))
}

/// Concatenates the selected documents in document order, each behind its
/// banner. Documents over `line_limit` lines are listed in
/// `excluded_identifiers` and contribute nothing else. Selected identifiers
/// with no matching document are ignored.
pub fn aggregate(
    documents: &[Document],
    selection: &Selection,
    line_limit: usize,
) -> AggregationResult {
    debug!(
        "Aggregating {} selected of {} documents",
        selection.len(),
        documents.len()
    );
    let mut concatenated_text = String::new();
    let mut excluded_identifiers = Vec::new();
    let mut stats = StatsOnlyResult::default();

    for document in selected(documents, selection) {
        let text = document.text();
        if exceeds_line_limit(text, line_limit) {
            warn!("Skipped {} due to line limit", document.identifier());
            excluded_identifiers.push(document.identifier().to_owned());
            continue;
        }
        trace!("Appending {}", document.identifier());
        concatenated_text.push_str(&banner(document.identifier()));
        concatenated_text.push_str(text);
        concatenated_text.push('\n');
        stats.add(text);
    }

    AggregationResult {
        concatenated_text,
        excluded_identifiers,
        total_words: stats.total_words,
        total_lines: stats.total_lines,
        total_files: stats.total_files,
    }
}

/// Totals for a live preview. The line limit is not applied here, so an
/// oversized document is counted even though `aggregate` would exclude it.
pub fn aggregate_stats_only(documents: &[Document], selection: &Selection) -> StatsOnlyResult {
    let mut stats = StatsOnlyResult::default();
    for document in selected(documents, selection) {
        stats.add(document.text());
    }
    stats
}
