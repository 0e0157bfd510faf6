use crate::utils::{expand_patterns, normalize_path, read_file_content};
use crate::CopyError;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

/// A loaded text buffer. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    identifier: String,
    text: String,
}

impl Document {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            identifier: identifier.into(),
            text: text.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The host's view of what is open: every tab, and the subset of tabs that
/// have a loaded document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn list_tabs(&self) -> Result<Vec<String>, CopyError>;
    async fn list_documents(&self) -> Result<Vec<Document>, CopyError>;
}

/// Treats a set of path patterns as the open tabs. A tab is loaded when its
/// file reads as UTF-8 text. Patterns are expanded once, on first use, and
/// the same tab list backs every later call.
pub struct FileDocumentSource {
    patterns: Vec<String>,
    tabs: OnceCell<Vec<String>>,
}

impl FileDocumentSource {
    pub fn new(patterns: Vec<String>) -> Self {
        FileDocumentSource {
            patterns,
            tabs: OnceCell::new(),
        }
    }

    async fn tabs(&self) -> Result<&Vec<String>, CopyError> {
        self.tabs
            .get_or_try_init(|| async {
                debug!("Expanding file patterns");
                let mut seen = HashSet::new();
                let tabs: Vec<String> = expand_patterns(&self.patterns)?
                    .into_iter()
                    .filter(|tab| seen.insert(tab.clone()))
                    .collect();
                Ok::<_, CopyError>(tabs)
            })
            .await
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn list_tabs(&self) -> Result<Vec<String>, CopyError> {
        Ok(self.tabs().await?.clone())
    }

    async fn list_documents(&self) -> Result<Vec<Document>, CopyError> {
        let mut documents = Vec::new();
        for tab in self.tabs().await? {
            match read_file_content(tab).await {
                Ok(text) => {
                    trace!("Loaded {} ({} bytes)", tab, text.len());
                    documents.push(Document::new(tab.clone(), text));
                }
                Err(e) => debug!("Could not load {}: {}", tab, e),
            }
        }
        Ok(documents)
    }
}

/// A fixed set of tabs and documents, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    tabs: Vec<String>,
    documents: Vec<Document>,
}

impl InMemoryDocumentSource {
    /// Every document is also a tab.
    pub fn new(documents: Vec<Document>) -> Self {
        let tabs = documents.iter().map(|d| d.identifier().to_owned()).collect();
        InMemoryDocumentSource { tabs, documents }
    }

    pub fn with_unloaded_tab(mut self, tab: impl Into<String>) -> Self {
        self.tabs.push(normalize_path(&tab.into()));
        self
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn list_tabs(&self) -> Result<Vec<String>, CopyError> {
        Ok(self.tabs.clone())
    }

    async fn list_documents(&self) -> Result<Vec<Document>, CopyError> {
        Ok(self.documents.clone())
    }
}

/// Tabs with no loaded document, in tab order.
pub fn find_unloaded_tabs(tabs: &[String], documents: &[Document]) -> Vec<String> {
    let loaded: HashSet<&str> = documents.iter().map(Document::identifier).collect();
    tabs.iter()
        .filter(|tab| !loaded.contains(tab.as_str()))
        .cloned()
        .collect()
}

pub fn unloaded_tabs_message(unloaded: &[String]) -> Option<String> {
    let message = match unloaded.len() {
        0 => return None,
        1 => "There is 1 file in the working set that is unable to be included because it could not be loaded as text. Affected file:".to_owned(),
        n => format!(
            "There are {} files in the working set that are unable to be included because they could not be loaded as text. Affected files:",
            n
        ),
    };
    Some(format!("{}\n{}", message, unloaded.join("\n")))
}
