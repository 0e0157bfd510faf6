use crate::aggregate::{aggregate_stats_only, Selection, StatsOnlyResult};
use crate::document::Document;
use crate::metrics::{count_lines, exceeds_line_limit};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Events the checklist sends to the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UiRequest {
    SelectionChanged { selected: Selection },
    Confirmed { selected: Selection },
}

/// Replies the presenter sends back to the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UiResponse {
    StatsUpdate {
        total_files: usize,
        total_words: usize,
        total_lines: usize,
        confirm_enabled: bool,
    },
}

impl UiResponse {
    pub fn stats_update(stats: StatsOnlyResult, confirm_enabled: bool) -> Self {
        UiResponse::StatsUpdate {
            total_files: stats.total_files,
            total_words: stats.total_words,
            total_lines: stats.total_lines,
            confirm_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    pub identifier: String,
    pub label: String,
}

/// One entry per document, in document order. Documents that the final
/// copy would skip are marked in their label.
pub fn build_selection_list(documents: &[Document], line_limit: usize) -> Vec<SelectionItem> {
    documents
        .iter()
        .map(|d| {
            let lines = count_lines(d.text());
            let unit = if lines == 1 { "line" } else { "lines" };
            let label = if exceeds_line_limit(d.text(), line_limit) {
                format!("{} ({} {}, over line limit)", d.identifier(), lines, unit)
            } else {
                format!("{} ({} {})", d.identifier(), lines, unit)
            };
            SelectionItem {
                identifier: d.identifier().to_owned(),
                label,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Selection,
    pub confirm_enabled: bool,
}

impl SelectionState {
    pub fn new(selected: Selection) -> Self {
        let confirm_enabled = !selected.is_empty();
        SelectionState {
            selected,
            confirm_enabled,
        }
    }
}

/// Holds the document snapshot for one invocation. Selection state is
/// passed in and handed back by each handler.
pub struct SelectionPresenter {
    documents: Vec<Document>,
    line_limit: usize,
}

impl SelectionPresenter {
    pub fn new(documents: Vec<Document>, line_limit: usize) -> Self {
        SelectionPresenter {
            documents,
            line_limit,
        }
    }

    pub fn items(&self) -> Vec<SelectionItem> {
        build_selection_list(&self.documents, self.line_limit)
    }

    pub fn initial_state(&self) -> SelectionState {
        SelectionState::new(Selection::all(&self.documents))
    }

    pub fn stats(&self, state: &SelectionState) -> StatsOnlyResult {
        aggregate_stats_only(&self.documents, &state.selected)
    }

    pub fn on_selection_changed(
        &self,
        _state: SelectionState,
        selected: Selection,
    ) -> (SelectionState, StatsOnlyResult) {
        let state = SelectionState::new(selected);
        let stats = self.stats(&state);
        trace!(
            "Selection changed: {} selected, confirm enabled: {}",
            state.selected.len(),
            state.confirm_enabled
        );
        (state, stats)
    }

    /// Returns the confirmed selection, or `None` when it is empty and
    /// confirming is disabled.
    pub fn on_confirmed(
        &self,
        state: SelectionState,
        selected: Selection,
    ) -> (SelectionState, Option<Selection>) {
        let (state, _) = self.on_selection_changed(state, selected);
        if state.confirm_enabled {
            let confirmed = state.selected.clone();
            (state, Some(confirmed))
        } else {
            debug!("Ignoring confirm with an empty selection");
            (state, None)
        }
    }

    /// Serves checklist events until a selection is confirmed. Returns
    /// `None` when the checklist goes away without confirming.
    pub async fn run(
        self,
        mut requests: mpsc::Receiver<UiRequest>,
        responses: mpsc::Sender<UiResponse>,
    ) -> Option<Selection> {
        let mut state = self.initial_state();
        let initial = UiResponse::stats_update(self.stats(&state), state.confirm_enabled);
        if responses.send(initial).await.is_err() {
            debug!("Checklist closed before the first stats update");
            return None;
        }

        while let Some(request) = requests.recv().await {
            match request {
                UiRequest::SelectionChanged { selected } => {
                    let (next, stats) = self.on_selection_changed(state, selected);
                    state = next;
                    let update = UiResponse::stats_update(stats, state.confirm_enabled);
                    if responses.send(update).await.is_err() {
                        debug!("Checklist closed while sending stats");
                        return None;
                    }
                }
                UiRequest::Confirmed { selected } => {
                    let (next, confirmed) = self.on_confirmed(state, selected);
                    state = next;
                    if confirmed.is_some() {
                        return confirmed;
                    }
                    let update = UiResponse::stats_update(self.stats(&state), false);
                    if responses.send(update).await.is_err() {
                        return None;
                    }
                }
            }
        }

        debug!("Checklist closed without confirming");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DEFAULT_LINE_LIMIT;

    fn presenter() -> SelectionPresenter {
        SelectionPresenter::new(
            vec![
                Document::new("a.txt", "hello world"),
                Document::new("b.txt", "foo\nbar\nbaz"),
            ],
            DEFAULT_LINE_LIMIT,
        )
    }

    #[test]
    fn test_initial_state_selects_everything() {
        let presenter = presenter();
        let state = presenter.initial_state();
        assert!(state.confirm_enabled);
        assert_eq!(state.selected.iter().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);
        assert_eq!(
            presenter.stats(&state),
            StatsOnlyResult {
                total_words: 5,
                total_lines: 4,
                total_files: 2
            }
        );
    }

    #[test]
    fn test_empty_selection_disables_confirm_until_reselected() {
        let presenter = presenter();
        let state = presenter.initial_state();

        let (state, stats) = presenter.on_selection_changed(state, Selection::new());
        assert!(!state.confirm_enabled);
        assert_eq!(stats, StatsOnlyResult::default());

        let (state, confirmed) = presenter.on_confirmed(state, Selection::new());
        assert_eq!(confirmed, None);

        let selected: Selection = ["b.txt"].into_iter().collect();
        let (state, stats) = presenter.on_selection_changed(state, selected);
        assert!(state.confirm_enabled);
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.total_lines, 3);
    }

    #[test]
    fn test_selection_list_labels_oversized_documents() {
        let documents = vec![
            Document::new("small.txt", "one"),
            Document::new("big.txt", "1\n2\n3"),
        ];
        let items = build_selection_list(&documents, 2);
        assert_eq!(items[0].identifier, "small.txt");
        assert_eq!(items[0].label, "small.txt (1 line)");
        assert_eq!(items[1].label, "big.txt (3 lines, over line limit)");
        assert_eq!(
            build_selection_list(&[Document::new("one.txt", "x")], 0)[0].label,
            "one.txt (1 line, over line limit)"
        );
    }

    #[test]
    fn test_messages_use_tagged_wire_format() {
        let request = UiRequest::SelectionChanged {
            selected: ["a.txt"].into_iter().collect(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"command": "selectionChanged", "selected": ["a.txt"]})
        );

        let response: UiResponse = serde_json::from_value(serde_json::json!({
            "command": "statsUpdate",
            "total_files": 1,
            "total_words": 2,
            "total_lines": 3,
            "confirm_enabled": true
        }))
        .unwrap();
        assert_eq!(
            response,
            UiResponse::StatsUpdate {
                total_files: 1,
                total_words: 2,
                total_lines: 3,
                confirm_enabled: true
            }
        );
    }

    #[tokio::test]
    async fn test_run_reports_stats_and_returns_confirmed_selection() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(4);
        let task = tokio::spawn(presenter().run(req_rx, resp_tx));

        let initial = resp_rx.recv().await.unwrap();
        assert_eq!(
            initial,
            UiResponse::StatsUpdate {
                total_files: 2,
                total_words: 5,
                total_lines: 4,
                confirm_enabled: true
            }
        );

        req_tx
            .send(UiRequest::Confirmed {
                selected: Selection::new(),
            })
            .await
            .unwrap();
        let rejected = resp_rx.recv().await.unwrap();
        assert!(matches!(
            rejected,
            UiResponse::StatsUpdate {
                confirm_enabled: false,
                ..
            }
        ));

        let selected: Selection = ["a.txt"].into_iter().collect();
        req_tx
            .send(UiRequest::Confirmed {
                selected: selected.clone(),
            })
            .await
            .unwrap();
        assert_eq!(task.await.unwrap(), Some(selected));
    }

    #[tokio::test]
    async fn test_run_returns_none_when_checklist_closes() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(4);
        let task = tokio::spawn(presenter().run(req_rx, resp_tx));

        resp_rx.recv().await.unwrap();
        drop(req_tx);
        assert_eq!(task.await.unwrap(), None);
    }
}
