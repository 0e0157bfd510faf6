use crate::aggregate::{aggregate, Selection};
use crate::checklist::ChecklistUi;
use crate::delivery::{deliver, ClipboardSink, DeliveryOutcome, NotificationSink};
use crate::document::{find_unloaded_tabs, unloaded_tabs_message, Document, DocumentSource};
use crate::metrics::DEFAULT_LINE_LIMIT;
use crate::presenter::SelectionPresenter;
use crate::CopyError;
use std::io::Write;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyConfig {
    pub line_limit: usize,
    pub use_stdout: bool,
    pub json: bool,
}

impl Default for CopyConfig {
    fn default() -> Self {
        CopyConfig {
            line_limit: DEFAULT_LINE_LIMIT,
            use_stdout: false,
            json: false,
        }
    }
}

/// A snapshot of the working set for one invocation.
pub struct WorkingSet {
    pub documents: Vec<Document>,
    pub unloaded: Vec<String>,
}

/// Lists the open documents and warns about tabs that have none.
pub async fn load_working_set(
    source: &dyn DocumentSource,
    notifier: &dyn NotificationSink,
) -> Result<WorkingSet, CopyError> {
    let tabs = source.list_tabs().await?;
    let documents = source.list_documents().await?;
    let unloaded = find_unloaded_tabs(&tabs, &documents);
    debug!(
        "Working set: {} tabs, {} loaded, {} not loaded",
        tabs.len(),
        documents.len(),
        unloaded.len()
    );

    if let Some(message) = unloaded_tabs_message(&unloaded) {
        notifier.show_warning(&message);
    }
    Ok(WorkingSet {
        documents,
        unloaded,
    })
}

pub fn copy_documents(
    documents: &[Document],
    selection: &Selection,
    config: &CopyConfig,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn NotificationSink,
) -> Result<DeliveryOutcome, CopyError> {
    let result = aggregate(documents, selection, config.line_limit);
    deliver(result, clipboard, notifier)
}

/// Copies every loaded document without asking.
pub async fn copy_all_open_documents(
    source: &dyn DocumentSource,
    config: &CopyConfig,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn NotificationSink,
) -> Result<DeliveryOutcome, CopyError> {
    let working_set = load_working_set(source, notifier).await?;
    let selection = Selection::all(&working_set.documents);
    copy_documents(
        &working_set.documents,
        &selection,
        config,
        clipboard,
        notifier,
    )
}

/// Lets the user pick documents on a checklist, then copies the confirmed
/// selection. Returns `None` when the checklist is closed without confirming.
pub async fn copy_selected_documents<R, W>(
    source: &dyn DocumentSource,
    config: &CopyConfig,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn NotificationSink,
    ui: ChecklistUi<R, W>,
) -> Result<Option<DeliveryOutcome>, CopyError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let working_set = load_working_set(source, notifier).await?;
    let ui = ui.with_notice(unloaded_tabs_message(&working_set.unloaded));

    let presenter = SelectionPresenter::new(working_set.documents.clone(), config.line_limit);
    let items = presenter.items();
    let (request_tx, request_rx) = mpsc::channel(8);
    let (response_tx, response_rx) = mpsc::channel(8);

    let (confirmed, ui_result) = tokio::join!(
        presenter.run(request_rx, response_tx),
        ui.run(items, request_tx, response_rx)
    );
    ui_result?;

    match confirmed {
        Some(selection) => copy_documents(
            &working_set.documents,
            &selection,
            config,
            clipboard,
            notifier,
        )
        .map(Some),
        None => {
            info!("No files copied.");
            Ok(None)
        }
    }
}
