pub mod aggregate;
pub mod checklist;
pub mod copy;
pub mod delivery;
pub mod document;
pub mod errors;
pub mod logger;
pub mod metrics;
pub mod presenter;
pub mod utils;

pub use aggregate::{aggregate, aggregate_stats_only, AggregationResult, Selection, StatsOnlyResult};
pub use copy::{copy_all_open_documents, copy_selected_documents, CopyConfig};
pub use document::{Document, DocumentSource, FileDocumentSource, InMemoryDocumentSource};
pub use errors::CopyError;
